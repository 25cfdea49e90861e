//! Disposition des colonnes d'un export
//!
//! Deux variantes existent: la disposition standard (libellés en colonne 0)
//! et une variante décalée d'une colonne vers la droite. La variante est
//! toujours choisie explicitement, jamais devinée.

use serde::{Deserialize, Serialize};

/// Variante de disposition des colonnes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// Libellés d'étage en colonne 0, titre en colonne 1
    #[default]
    Standard,
    /// Toutes les colonnes décalées de +1
    Shifted,
}

impl std::str::FromStr for LayoutVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(LayoutVariant::Standard),
            "shifted" | "decale" | "décalé" => Ok(LayoutVariant::Shifted),
            _ => Err(format!("Invalid layout: {}. Use: standard, shifted", s)),
        }
    }
}

impl LayoutVariant {
    pub fn columns(self) -> ColumnLayout {
        match self {
            LayoutVariant::Standard => ColumnLayout::STANDARD,
            LayoutVariant::Shifted => ColumnLayout::STANDARD.shifted(1),
        }
    }
}

/// Index des cellules désignées d'une ligne
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Cellule portant "... Titre foncier : 154311 /05"
    pub title_label: usize,
    /// Cellule portant "Propriété dite" (le nom est dans la cellule suivante)
    pub header_label: usize,
    /// Cellule portant "Nom d'étage : cotes"
    pub floor_label: usize,
    /// Cellule portant "Total" en fin d'étage
    pub total_label: usize,
    pub propriete: usize,
    pub titre_num: usize,
    pub indice_privative: usize,
    pub indice_commune: usize,
    pub surface_interieure: usize,
    pub surface_avec_surplomb: usize,
    pub consistance: usize,
    pub observations: usize,
}

impl ColumnLayout {
    /// Disposition canonique
    ///
    /// ```text
    /// 0 propriété | 1 titre n° | 2 - | 3 indice privatif | 4 indice commun |
    /// 5 surf. intérieure | 6 surf. avec surplomb | 7 consistance | 8 observations
    /// ```
    pub const STANDARD: ColumnLayout = ColumnLayout {
        title_label: 1,
        header_label: 0,
        floor_label: 0,
        total_label: 1,
        propriete: 0,
        titre_num: 1,
        indice_privative: 3,
        indice_commune: 4,
        surface_interieure: 5,
        surface_avec_surplomb: 6,
        consistance: 7,
        observations: 8,
    };

    /// Décale uniformément tous les index
    pub const fn shifted(self, offset: usize) -> ColumnLayout {
        ColumnLayout {
            title_label: self.title_label + offset,
            header_label: self.header_label + offset,
            floor_label: self.floor_label + offset,
            total_label: self.total_label + offset,
            propriete: self.propriete + offset,
            titre_num: self.titre_num + offset,
            indice_privative: self.indice_privative + offset,
            indice_commune: self.indice_commune + offset,
            surface_interieure: self.surface_interieure + offset,
            surface_avec_surplomb: self.surface_avec_surplomb + offset,
            consistance: self.consistance + offset,
            observations: self.observations + offset,
        }
    }
}

/// Options du parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Séparateur de champs (un seul octet ASCII)
    pub separator: char,

    pub layout: LayoutVariant,

    /// Lignes consommées à partir du marqueur "Propriété dite" (inclus), au moins 1
    pub header_skip: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            separator: ';',
            layout: LayoutVariant::Standard,
            header_skip: 1,
        }
    }
}

impl ParserOptions {
    pub fn columns(&self) -> ColumnLayout {
        self.layout.columns()
    }
}
