use thiserror::Error;

use crate::shares::ShareError;
use crate::tables::ReportKind;

/// Erreurs de génération des tableaux
#[derive(Debug, Error)]
pub enum ReportError {
    /// Aucun titre n'a été importé dans la session
    #[error("No data loaded: import a CSV export first")]
    NoData,

    #[error(transparent)]
    Shares(#[from] ShareError),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Valeur décimale non représentable dans une cellule numérique
    #[error("Number out of range for a spreadsheet cell: {0}")]
    Number(String),

    /// Deux tableaux demandés produiraient le même fichier
    #[error("{first} and {second} would both be written to {file_name}")]
    FileNameCollision {
        first: ReportKind,
        second: ReportKind,
        file_name: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
