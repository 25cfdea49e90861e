//! Description d'une feuille de calcul: cellules, fusions, hauteurs et largeurs
//!
//! Une `Grid` est la sortie des moteurs de mise en page. Elle ne dépend
//! d'aucun format de fichier: la sérialisation xlsx est faite par
//! [`crate::export::xlsx`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

pub type RowNum = u32;
pub type ColNum = u16;

/// Rôle visuel d'une cellule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Emphasis {
    /// Intitulé du tableau
    Title,
    /// Lignes d'identification (titre foncier, propriété)
    Subtitle,
    /// En-têtes de colonnes
    Header,
    Body,
    /// Ligne de regroupement par consistance
    Category,
    /// Sous-total d'étage
    Subtotal,
    /// Total général
    Total,
}

/// Nature du contenu, qui détermine alignement et format numérique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Content {
    Text,
    Centered,
    /// Nombre à 2 décimales
    Decimal2,
    /// Nombre entier
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellStyle {
    pub emphasis: Emphasis,
    pub content: Content,
}

impl CellStyle {
    pub const fn new(emphasis: Emphasis, content: Content) -> Self {
        Self { emphasis, content }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

/// Zone fusionnée; la valeur est portée par la cellule en haut à gauche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeRange {
    pub first_row: RowNum,
    pub first_col: ColNum,
    pub last_row: RowNum,
    pub last_col: ColNum,
}

impl MergeRange {
    pub fn contains(&self, row: RowNum, col: ColNum) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    fn overlaps(&self, other: &MergeRange) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_col <= other.last_col
            && other.first_col <= self.last_col
    }

    /// Nombre de lignes couvertes
    pub fn row_span(&self) -> RowNum {
        self.last_row - self.first_row + 1
    }
}

/// Feuille décrite cellule par cellule
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub sheet_name: String,
    cells: BTreeMap<(RowNum, ColNum), Cell>,
    merges: Vec<MergeRange>,
    row_heights: BTreeMap<RowNum, f64>,
    column_widths: Vec<f64>,
}

impl Grid {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            row_heights: BTreeMap::new(),
            column_widths: Vec::new(),
        }
    }

    pub fn set(&mut self, row: RowNum, col: ColNum, value: CellValue, style: CellStyle) {
        self.cells.insert((row, col), Cell { value, style });
    }

    pub fn text(&mut self, row: RowNum, col: ColNum, text: impl Into<String>, style: CellStyle) {
        self.set(row, col, CellValue::Text(text.into()), style);
    }

    pub fn number(&mut self, row: RowNum, col: ColNum, value: Decimal, style: CellStyle) {
        self.set(row, col, CellValue::Number(value), style);
    }

    pub fn blank(&mut self, row: RowNum, col: ColNum, style: CellStyle) {
        self.set(row, col, CellValue::Blank, style);
    }

    /// Fusionne une zone; une zone d'une seule cellule n'est pas une fusion et est ignorée.
    ///
    /// Retourne `true` si la fusion a été enregistrée.
    pub fn merge(
        &mut self,
        first_row: RowNum,
        first_col: ColNum,
        last_row: RowNum,
        last_col: ColNum,
    ) -> bool {
        if last_row < first_row || last_col < first_col {
            return false;
        }
        if first_row == last_row && first_col == last_col {
            return false;
        }
        let range = MergeRange {
            first_row,
            first_col,
            last_row,
            last_col,
        };
        debug_assert!(
            !self.merges.iter().any(|m| m.overlaps(&range)),
            "overlapping merge {:?}",
            range
        );
        self.merges.push(range);
        true
    }

    /// Fusion verticale de `count` lignes à partir de `first_row`
    pub fn merge_rows(&mut self, col: ColNum, first_row: RowNum, count: RowNum) -> bool {
        if count == 0 {
            return false;
        }
        self.merge(first_row, col, first_row + count - 1, col)
    }

    /// Fusion horizontale sur une ligne
    pub fn merge_cols(&mut self, row: RowNum, first_col: ColNum, last_col: ColNum) -> bool {
        self.merge(row, first_col, row, last_col)
    }

    pub fn set_row_height(&mut self, row: RowNum, height: f64) {
        self.row_heights.insert(row, height);
    }

    pub fn set_column_widths(&mut self, widths: impl IntoIterator<Item = f64>) {
        self.column_widths = widths.into_iter().collect();
    }

    pub fn cell(&self, row: RowNum, col: ColNum) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Cellules dans l'ordre ligne puis colonne
    pub fn cells(&self) -> impl Iterator<Item = (RowNum, ColNum, &Cell)> {
        self.cells.iter().map(|(&(r, c), cell)| (r, c, cell))
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }

    /// Zone fusionnée dont la cellule est l'ancre (haut à gauche)
    pub fn merge_anchored_at(&self, row: RowNum, col: ColNum) -> Option<&MergeRange> {
        self.merges
            .iter()
            .find(|m| m.first_row == row && m.first_col == col)
    }

    /// Vrai si la cellule est recouverte par une fusion sans en être l'ancre
    pub fn is_covered(&self, row: RowNum, col: ColNum) -> bool {
        self.merges
            .iter()
            .any(|m| m.contains(row, col) && !(m.first_row == row && m.first_col == col))
    }

    pub fn row_heights(&self) -> impl Iterator<Item = (RowNum, f64)> + '_ {
        self.row_heights.iter().map(|(&r, &h)| (r, h))
    }

    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    /// Nombre de lignes utilisées
    pub fn row_count(&self) -> RowNum {
        self.cells
            .keys()
            .map(|&(r, _)| r + 1)
            .chain(self.merges.iter().map(|m| m.last_row + 1))
            .max()
            .unwrap_or(0)
    }

    /// Texte d'une cellule, pour l'inspection et les tests
    pub fn text_at(&self, row: RowNum, col: ColNum) -> Option<&str> {
        match self.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Nombre d'une cellule, pour l'inspection et les tests
    pub fn number_at(&self, row: RowNum, col: ColNum) -> Option<Decimal> {
        match self.cell(row, col).map(|c| &c.value) {
            Some(CellValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Première ligne dont la colonne `col` porte exactement `text`
    pub fn find_row(&self, col: ColNum, text: &str) -> Option<RowNum> {
        self.cells()
            .find(|&(_, c, cell)| c == col && cell.value == CellValue::Text(text.to_string()))
            .map(|(r, _, _)| r)
    }
}
