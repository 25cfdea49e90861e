//! Moteurs de mise en page des tableaux de copropriété
//!
//! Tous les tableaux commencent par le même bloc d'en-tête et finissent par
//! une ligne de total général. Voix, Quot P CH2, TA et TR-N ont un groupe de
//! lignes par étage, dont les cellules qui nomment l'étage sont fusionnées
//! sur exactement les lignes de lots de cet étage. TR-C résume le titre
//! entier par consistance.

pub mod consistances;
pub mod contenances;
pub mod niveaux;
pub mod quote_part;
pub mod voix;

use serde::{Deserialize, Serialize};
use tracing::debug;

use titre_foncier::Title;

use crate::error::ReportError;
use crate::grid::{CellStyle, ColNum, Content, Emphasis, Grid, RowNum};
use crate::shares;

/// Exposant utilisé à la place de chaque "a" minuscule des indices et observations
pub const EXPOSANT_A: char = '\u{1D43}';

/// Tableaux générables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportKind {
    /// Nombre de voix des copropriétaires
    Voix,
    /// Répartition des quotes-parts et tantièmes d'indivision
    QuotePart,
    /// Contenances de la copropriété (TA)
    Contenances,
    /// Superficies détaillées par niveau (TR-N)
    Niveaux,
    /// Superficies totales par consistance (TR-C)
    Consistances,
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "voix" => Ok(ReportKind::Voix),
            "quot" | "quot-p-ch2" | "quote-part" => Ok(ReportKind::QuotePart),
            "ta" | "contenances" => Ok(ReportKind::Contenances),
            "tr-n" | "trn" | "niveaux" => Ok(ReportKind::Niveaux),
            "tr-c" | "trc" | "consistances" => Ok(ReportKind::Consistances),
            _ => Err(format!(
                "Unknown report: {}. Use: voix, quot, ta, trn, trc",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::QuotePart,
        ReportKind::Niveaux,
        ReportKind::Consistances,
        ReportKind::Contenances,
        ReportKind::Voix,
    ];

    /// Sélection par défaut: un tableau par nom de fichier
    pub const DEFAULT: [ReportKind; 4] = [
        ReportKind::QuotePart,
        ReportKind::Consistances,
        ReportKind::Contenances,
        ReportKind::Voix,
    ];

    /// Code court du tableau
    pub fn code(self) -> &'static str {
        match self {
            ReportKind::Voix => "Voix",
            ReportKind::QuotePart => "Quot P CH2",
            ReportKind::Contenances => "TA",
            ReportKind::Niveaux => "TR-N",
            ReportKind::Consistances => "TR-C",
        }
    }

    /// Nom du fichier produit.
    ///
    /// TA et TR-N partagent le même nom de fichier.
    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::Voix => "Voix.xlsx",
            ReportKind::QuotePart => "Quot_P_CH2.xlsx",
            ReportKind::Contenances | ReportKind::Niveaux => "TA.xlsx",
            ReportKind::Consistances => "TR_C.xlsx",
        }
    }

    /// Intitulé imprimé en tête du tableau
    pub fn heading(self) -> &'static str {
        match self {
            ReportKind::Voix => "Le nombre de voix des copropriétaires",
            ReportKind::QuotePart => {
                "Tableau de répartition des quotes-parts et des tantièmes d'indivision"
            }
            ReportKind::Contenances => "Tableau des contenances de la copropriété",
            ReportKind::Niveaux => "Tableau détaillé des superficies par niveau",
            ReportKind::Consistances => {
                "Tableau récapitulatif des superficies totales par consistance"
            }
        }
    }

    /// Vrai si le tableau a besoin du calcul des parts
    pub fn needs_shares(self) -> bool {
        matches!(self, ReportKind::Voix | ReportKind::QuotePart)
    }
}

/// Construit la grille d'un tableau.
///
/// Les parts sont recalculées à chaque appel: la grille est toujours
/// cohérente avec le titre fourni.
///
/// # Errors
///
/// `ReportError::Shares` si le tableau a besoin des parts et que la surface
/// privative totale est nulle, ou si le calcul des parts déborde.
pub fn render(kind: ReportKind, title: &Title) -> Result<Grid, ReportError> {
    let grid = match kind {
        ReportKind::Voix => voix::render(title, &shares::compute(title)?),
        ReportKind::QuotePart => quote_part::render(title, &shares::compute(title)?),
        ReportKind::Contenances => contenances::render(title),
        ReportKind::Niveaux => niveaux::render(title),
        ReportKind::Consistances => consistances::render(title),
    };

    debug!(
        report = kind.code(),
        rows = grid.row_count(),
        merges = grid.merges().len(),
        "Grid rendered"
    );
    Ok(grid)
}

/// Remplace chaque "a" minuscule par son exposant ("12a" → "12ᵃ")
pub fn exposant(text: &str) -> String {
    text.replace('a', &EXPOSANT_A.to_string())
}

/// Colonne d'un tableau
pub(crate) struct Column {
    pub header: &'static str,
    pub width: f64,
}

pub(crate) const TITLE: CellStyle = CellStyle::new(Emphasis::Title, Content::Centered);
pub(crate) const SUBTITLE: CellStyle = CellStyle::new(Emphasis::Subtitle, Content::Text);
pub(crate) const HEADER: CellStyle = CellStyle::new(Emphasis::Header, Content::Centered);
pub(crate) const BODY_TEXT: CellStyle = CellStyle::new(Emphasis::Body, Content::Text);
pub(crate) const BODY_CENTERED: CellStyle = CellStyle::new(Emphasis::Body, Content::Centered);
pub(crate) const BODY_DECIMAL: CellStyle = CellStyle::new(Emphasis::Body, Content::Decimal2);
pub(crate) const BODY_INTEGER: CellStyle = CellStyle::new(Emphasis::Body, Content::Integer);

const TITLE_HEIGHT: f64 = 30.0;
const HEADER_HEIGHT: f64 = 45.0;
pub(crate) const TOTAL_HEIGHT: f64 = 20.0;

/// Écrit le bloc d'en-tête et retourne la première ligne de données.
///
/// ```text
/// 0  intitulé (fusionné sur toutes les colonnes)
/// 1  Titre foncier : ...
/// 2  Propriété dite : ...
/// 3  (vide)
/// 4  en-têtes de colonnes
/// ```
pub(crate) fn header_block(
    grid: &mut Grid,
    kind: ReportKind,
    title: &Title,
    columns: &[Column],
) -> RowNum {
    let last_col = columns.len().saturating_sub(1) as ColNum;

    grid.text(0, 0, kind.heading(), TITLE);
    grid.merge_cols(0, 0, last_col);
    grid.set_row_height(0, TITLE_HEIGHT);

    grid.text(
        1,
        0,
        format!("Titre foncier : {}", title.titre_foncier),
        SUBTITLE,
    );
    grid.merge_cols(1, 0, last_col);

    grid.text(
        2,
        0,
        format!("Propriété dite : {}", title.propriete_nom),
        SUBTITLE,
    );
    grid.merge_cols(2, 0, last_col);

    for (col, column) in columns.iter().enumerate() {
        grid.text(4, col as ColNum, column.header, HEADER);
    }
    grid.set_row_height(4, HEADER_HEIGHT);
    grid.set_column_widths(columns.iter().map(|c| c.width));

    5
}

/// Écrit une ligne de (sous-)total: libellé fusionné sur `label_cols`
/// colonnes, puis une cellule par valeur; `None` laisse la cellule vide.
pub(crate) fn total_row(
    grid: &mut Grid,
    row: RowNum,
    emphasis: Emphasis,
    label: String,
    label_cols: ColNum,
    values: &[(Option<rust_decimal::Decimal>, Content)],
) {
    let label_style = CellStyle::new(emphasis, Content::Text);
    grid.text(row, 0, label, label_style);
    grid.merge_cols(row, 0, label_cols.saturating_sub(1));

    for (offset, (value, content)) in values.iter().enumerate() {
        let col = label_cols + offset as ColNum;
        let style = CellStyle::new(emphasis, *content);
        match value {
            Some(v) => grid.number(row, col, *v, style),
            None => grid.blank(row, col, style),
        }
    }
    grid.set_row_height(row, TOTAL_HEIGHT);
}
