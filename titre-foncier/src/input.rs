//! Lecture des fichiers d'entrée: contrôle, décodage et découpage en lignes

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::TitreFoncierError;

/// Refuse les fichiers qui ne portent pas l'extension .csv
pub fn check_extension(path: &Path) -> Result<(), TitreFoncierError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(())
    } else {
        Err(TitreFoncierError::NotCsv(path.display().to_string()))
    }
}

/// Décode le contenu brut en texte.
///
/// Un BOM éventuel (UTF-8, UTF-16 LE/BE) choisit l'encodage et est retiré;
/// sans BOM le contenu doit être de l'UTF-8 valide. Aucun caractère de
/// remplacement n'est toléré: un contenu mal encodé est refusé.
pub fn decode(data: &[u8]) -> Result<Cow<'_, str>, TitreFoncierError> {
    let text = match Encoding::for_bom(data) {
        Some((encoding, bom_len)) => {
            let body = &data[bom_len..];
            if encoding == UTF_8 {
                Cow::Borrowed(validate_utf8(body)?)
            } else {
                encoding
                    .decode_without_bom_handling_and_without_replacement(body)
                    .ok_or_else(|| TitreFoncierError::unreadable(encoding.name()))?
            }
        }
        None => Cow::Borrowed(validate_utf8(data)?),
    };

    if text.trim().is_empty() {
        return Err(TitreFoncierError::EmptyInput);
    }
    Ok(text)
}

fn validate_utf8(data: &[u8]) -> Result<&str, TitreFoncierError> {
    simdutf8::basic::from_utf8(data).map_err(|_| TitreFoncierError::unreadable(UTF_8.name()))
}

/// Découpe le texte en lignes de cellules.
///
/// Les champs entre guillemets peuvent contenir le séparateur; les lignes
/// peuvent avoir un nombre variable de cellules.
pub fn read_rows(text: &str, separator: char) -> Result<Vec<Vec<String>>, TitreFoncierError> {
    let delimiter = u8::try_from(separator)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(TitreFoncierError::InvalidSeparator(separator))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(map_csv_error)?;

        // Le lecteur saute les lignes vides: on les restitue pour que
        // l'index d'une ligne reste son numéro dans le fichier
        let line = record
            .position()
            .map_or(rows.len() + 1, |p| p.line() as usize);
        while rows.len() + 1 < line {
            rows.push(Vec::new());
        }

        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn map_csv_error(err: csv::Error) -> TitreFoncierError {
    let line = err.position().map_or(0, |p| p.line());
    TitreFoncierError::csv(line, err.to_string())
}
