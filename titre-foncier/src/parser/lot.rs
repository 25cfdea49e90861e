//! Extraction des champs d'une ligne de lot

use rust_decimal::Decimal;

use crate::layout::ColumnLayout;
use crate::numeric::{parse_decimal, MAX_SURFACE};
use crate::types::{Diagnostic, DiagnosticKind, Lot, SurfaceField};

/// Cellule à l'index donné; une cellule hors de la ligne est vide
pub(crate) fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}

fn text(row: &[String], index: usize) -> String {
    cell(row, index).trim().to_string()
}

fn optional_text(row: &[String], index: usize) -> Option<String> {
    let value = cell(row, index).trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Lit une surface: absente → 0. Illisible, négative ou hors bornes → ligne écartée
fn surface(
    row: &[String],
    index: usize,
    field: SurfaceField,
    line: usize,
) -> Result<Decimal, Diagnostic> {
    let raw = cell(row, index);
    let value = raw.trim().to_string();
    match parse_decimal(raw) {
        Some(v) if v.is_sign_negative() && !v.is_zero() => Err(Diagnostic::skipped(
            line,
            DiagnosticKind::NegativeSurface { field, value },
        )),
        Some(v) if v > Decimal::from(MAX_SURFACE) => Err(Diagnostic::skipped(
            line,
            DiagnosticKind::SurfaceOutOfRange { field, value },
        )),
        Some(v) => Ok(v),
        None if value.is_empty() => Ok(Decimal::ZERO),
        None => Err(Diagnostic::skipped(
            line,
            DiagnosticKind::InvalidNumber { field, value },
        )),
    }
}

/// Construit un lot depuis une ligne candidate.
///
/// Les avertissements (lot conservé) sont ajoutés à `warnings`; une erreur
/// signifie que la ligne est écartée, sans avertissement.
pub(crate) fn extract(
    row: &[String],
    columns: &ColumnLayout,
    line: usize,
    warnings: &mut Vec<Diagnostic>,
) -> Result<Lot, Diagnostic> {
    let indice_privative = optional_text(row, columns.indice_privative);
    let indice_commune = optional_text(row, columns.indice_commune);

    if indice_privative.is_none() && indice_commune.is_none() {
        return Err(Diagnostic::skipped(line, DiagnosticKind::MissingIndex));
    }

    let surface_interieure = surface(
        row,
        columns.surface_interieure,
        SurfaceField::Interieure,
        line,
    )?;
    let surface_avec_surplomb = surface(
        row,
        columns.surface_avec_surplomb,
        SurfaceField::AvecSurplomb,
        line,
    )?;

    if surface_avec_surplomb < surface_interieure {
        warnings.push(Diagnostic::warning(
            line,
            DiagnosticKind::SurplombBelowInterior,
        ));
    }

    Ok(Lot {
        propriete: text(row, columns.propriete),
        titre_num: text(row, columns.titre_num),
        indice_privative,
        indice_commune,
        surface_interieure,
        surface_avec_surplomb,
        consistance: text(row, columns.consistance),
        observations: optional_text(row, columns.observations),
    })
}
