//! # copropriete
//!
//! Génération des tableaux réglementaires d'une copropriété à partir d'un
//! export CSV de titre foncier.
//!
//! ## Features
//!
//! - Calcul des voix, quotes-parts et tantièmes d'indivision en décimal
//! - Cinq tableaux: Voix, Quot P CH2, TA (contenances), TR-N (par niveau),
//!   TR-C (par consistance)
//! - Classeurs xlsx reproductibles (rust_xlsxwriter)
//! - Rapport de génération (console et JSON)
//!
//! ## Usage CLI
//!
//! ```bash
//! # Structure du titre et anomalies de lecture
//! copropriete inspect --input titre.csv
//!
//! # Tableaux Voix, Quot P CH2, TA et TR-C
//! copropriete generate --input titre.csv --output ./tableaux/
//!
//! # Tableau par niveau, export décalé d'une colonne
//! copropriete generate --input titre.csv --output ./tr-n/ --report trn --config decale
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod report;
pub mod session;
pub mod shares;
pub mod tables;

pub use config::Config;
pub use error::ReportError;
pub use export::GeneratedReport;
pub use report::{GenerationReport, GenerationStatus};
pub use session::Session;
pub use shares::{ShareError, ShareTable};
pub use tables::ReportKind;
