//! Types d'erreurs pour le crate titre-foncier

use thiserror::Error;

/// Erreurs pouvant survenir avant ou pendant la lecture d'un export CSV.
///
/// Les anomalies de lignes (lot malformé, nombre illisible) ne sont pas des
/// erreurs: elles sont collectées comme [`crate::Diagnostic`] et le parsing
/// continue.
#[derive(Debug, Error)]
pub enum TitreFoncierError {
    /// Erreur d'I/O lors de la lecture du fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Le fichier fourni n'a pas l'extension .csv
    #[error("Not a CSV file: {0}")]
    NotCsv(String),

    /// Fichier vide (ou ne contenant qu'un BOM)
    #[error("Input is empty")]
    EmptyInput,

    /// Contenu non décodable dans l'encodage détecté
    #[error("Unreadable encoding: {0}")]
    UnreadableEncoding(String),

    /// Séparateur de champs non utilisable par le lecteur CSV
    #[error("Invalid field separator {0:?}: expected a single ASCII character")]
    InvalidSeparator(char),

    /// Erreur du lecteur CSV (guillemets non fermés, etc.)
    #[error("CSV error at line {line}: {reason}")]
    Csv { line: u64, reason: String },
}

impl TitreFoncierError {
    /// Crée une erreur de lecture CSV avec sa position
    pub fn csv(line: u64, reason: impl Into<String>) -> Self {
        Self::Csv {
            line,
            reason: reason.into(),
        }
    }

    /// Crée une erreur d'encodage
    pub fn unreadable(encoding: impl Into<String>) -> Self {
        Self::UnreadableEncoding(encoding.into())
    }
}
