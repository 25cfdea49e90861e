//! # titre-foncier
//!
//! Parser pour les exports CSV de titres fonciers en copropriété.
//!
//! Un export retrace les modifications successives d'un titre: une ligne de
//! titre ("... Titre foncier : 154311 /05"), un bloc d'en-tête
//! ("Propriété dite"), puis une suite d'étages ("Rez-de-chaussée : cotes")
//! contenant chacun des lignes de lots, éventuellement closes par une ligne
//! "Total".
//!
//! ## Features
//!
//! - Décodage UTF-8 (avec ou sans BOM) et UTF-16 avec BOM
//! - Champs entre guillemets et lignes de longueur variable
//! - Surfaces en décimal à virgule fixe (`rust_decimal`)
//! - Anomalies de lignes collectées en diagnostics, jamais fatales
//!
//! ## Usage
//!
//! ```rust,ignore
//! use titre_foncier::{parse, ParserOptions};
//! use std::path::Path;
//!
//! let result = parse(Path::new("titre.csv"), &ParserOptions::default())?;
//! println!("Titre foncier: {}", result.title.titre_foncier);
//!
//! for floor in &result.title.etages {
//!     println!("{}: {} lots", floor.nom, floor.lots.len());
//! }
//! ```

pub mod error;
pub mod input;
pub mod layout;
pub mod numeric;
pub mod parser;
pub mod types;

pub use error::TitreFoncierError;
pub use layout::{ColumnLayout, LayoutVariant, ParserOptions};
pub use types::{
    Diagnostic, DiagnosticKind, Floor, Lot, ParseResult, Severity, SurfaceField, Title,
};

use std::path::Path;

use tracing::info;

/// Parse un export CSV de titre foncier.
///
/// # Errors
///
/// Retourne `TitreFoncierError` si le fichier n'est pas un .csv, est vide,
/// illisible, ou mal encodé. Les lignes malformées ne sont pas des erreurs:
/// elles sont listées dans `ParseResult::diagnostics`.
pub fn parse(path: &Path, options: &ParserOptions) -> Result<ParseResult, TitreFoncierError> {
    input::check_extension(path)?;
    let data = std::fs::read(path)?;
    let result = parse_bytes(&data, options)?;

    info!(
        path = %path.display(),
        titre = %result.title.titre_foncier,
        floors = result.title.etages.len(),
        lots = result.title.lot_count(),
        diagnostics = result.diagnostics.len(),
        "CSV parsed"
    );
    Ok(result)
}

/// Parse le contenu brut d'un export (détection du BOM, validation de l'encodage)
pub fn parse_bytes(data: &[u8], options: &ParserOptions) -> Result<ParseResult, TitreFoncierError> {
    let text = input::decode(data)?;
    parse_str(&text, options)
}

/// Parse un export déjà décodé
pub fn parse_str(text: &str, options: &ParserOptions) -> Result<ParseResult, TitreFoncierError> {
    let rows = input::read_rows(text, options.separator)?;
    Ok(parser::parse_rows(&rows, options))
}
