//! Génération et écriture des classeurs
//!
//! La génération est tout ou rien: tous les tableaux demandés sont rendus en
//! mémoire avant qu'un seul fichier soit écrit, et chaque fichier passe par
//! un nom temporaire renommé une fois complet.

pub mod xlsx;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use titre_foncier::Title;

use crate::error::ReportError;
use crate::tables::{self, ReportKind};

/// Classeur généré, prêt à être écrit
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReport {
    pub kind: ReportKind,
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

/// Vérifie que deux tableaux demandés n'écrivent pas le même fichier
pub fn check_file_names(kinds: &[ReportKind]) -> Result<(), ReportError> {
    for (i, first) in kinds.iter().enumerate() {
        if let Some(second) = kinds[i + 1..]
            .iter()
            .find(|k| *k != first && k.file_name() == first.file_name())
        {
            return Err(ReportError::FileNameCollision {
                first: *first,
                second: *second,
                file_name: first.file_name(),
            });
        }
    }
    Ok(())
}

/// Rend les tableaux demandés, en mémoire.
///
/// Les doublons sont ignorés; l'ordre des demandes est conservé.
///
/// # Errors
///
/// Aucun classeur n'est retourné si un seul tableau échoue.
pub fn generate(title: &Title, kinds: &[ReportKind]) -> Result<Vec<GeneratedReport>, ReportError> {
    let mut unique: Vec<ReportKind> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !unique.contains(kind) {
            unique.push(*kind);
        }
    }
    check_file_names(&unique)?;

    unique
        .into_iter()
        .map(|kind| {
            let grid = tables::render(kind, title)?;
            let bytes = xlsx::to_bytes(&grid)?;
            debug!(report = kind.code(), bytes = bytes.len(), "Workbook built");
            Ok(GeneratedReport {
                kind,
                file_name: kind.file_name(),
                bytes,
            })
        })
        .collect()
}

/// Écrit les classeurs dans `dir` et retourne les chemins créés.
///
/// Tous les fichiers temporaires sont écrits avant le premier renommage. Si
/// une étape échoue, les fichiers produits par cet appel sont supprimés.
pub fn write_all(reports: &[GeneratedReport], dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(dir)?;

    let staged: Vec<(PathBuf, PathBuf)> = reports
        .iter()
        .map(|r| {
            (
                dir.join(format!(".{}.tmp", r.file_name)),
                dir.join(r.file_name),
            )
        })
        .collect();

    for (report, (tmp, _)) in reports.iter().zip(&staged) {
        if let Err(e) = fs::write(tmp, &report.bytes) {
            warn!(path = %tmp.display(), "Write failed, removing temporary files");
            discard(staged.iter().map(|(tmp, _)| tmp));
            return Err(e.into());
        }
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, path) {
            warn!(path = %path.display(), "Rename failed, removing files already written");
            discard(
                staged[..i]
                    .iter()
                    .map(|(_, path)| path)
                    .chain(staged[i..].iter().map(|(tmp, _)| tmp)),
            );
            return Err(e.into());
        }
    }

    for (report, (_, path)) in reports.iter().zip(&staged) {
        info!(
            report = report.kind.code(),
            path = %path.display(),
            bytes = report.bytes.len(),
            "Report written"
        );
    }
    Ok(staged.into_iter().map(|(_, path)| path).collect())
}

fn discard<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}
