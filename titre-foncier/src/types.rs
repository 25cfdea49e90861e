//! Types de données pour le crate titre-foncier

use rust_decimal::Decimal;
use serde::Serialize;

/// Un lot d'un étage: partie privative vendable ou ligne de parties communes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lot {
    /// Désignation du propriétaire ("Propriété dite")
    pub propriete: String,

    /// Référence du titre (Titre N°)
    pub titre_num: String,

    /// Indice de la partie privative; sa présence fait du lot une unité vendable
    pub indice_privative: Option<String>,

    /// Indice de la quote-part des parties communes
    pub indice_commune: Option<String>,

    /// Surface intérieure (m²)
    pub surface_interieure: Decimal,

    /// Surface avec surplomb (m²), >= surface intérieure
    pub surface_avec_surplomb: Decimal,

    /// Consistance (Appartement, Local Commercial, ...)
    pub consistance: String,

    /// Observations libres
    pub observations: Option<String>,
}

impl Lot {
    /// Vrai si le lot porte un indice privatif et participe au calcul des quotes-parts
    pub fn is_private(&self) -> bool {
        self.indice_privative.is_some()
    }
}

/// Un étage (niveau) et ses lots, dans l'ordre du fichier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Floor {
    /// Ex: "Rez-de-chaussée", "Premier Etage"
    pub nom: String,

    /// Ex: "De la cote 4,30m à la cote 7,30m"
    pub cotes: String,

    pub lots: Vec<Lot>,

    /// Somme des surfaces intérieures de tous les lots (privatifs ou non)
    pub total_surface_interieure: Decimal,

    /// Somme des surfaces avec surplomb de tous les lots (privatifs ou non)
    pub total_surface_avec_surplomb: Decimal,
}

impl Floor {
    /// Construit un étage et calcule ses totaux de surface.
    ///
    /// Les totaux saturent à `Decimal::MAX`; le parser garantit qu'ils restent
    /// exacts (surfaces bornées par `numeric::MAX_SURFACE`).
    pub fn new(nom: String, cotes: String, lots: Vec<Lot>) -> Self {
        let total_surface_interieure = saturating_sum(lots.iter().map(|l| l.surface_interieure));
        let total_surface_avec_surplomb =
            saturating_sum(lots.iter().map(|l| l.surface_avec_surplomb));
        Self {
            nom,
            cotes,
            lots,
            total_surface_interieure,
            total_surface_avec_surplomb,
        }
    }

    /// Lots portant un indice privatif
    pub fn private_lots(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter().filter(|l| l.is_private())
    }
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Structure complète d'un titre foncier importé
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Title {
    /// Ex: "154311 /05"
    pub titre_foncier: String,

    /// Nom de la propriété (cellule qui suit "Propriété dite")
    pub propriete_nom: String,

    pub etages: Vec<Floor>,
}

impl Title {
    /// Nombre total de lots, tous étages confondus
    pub fn lot_count(&self) -> usize {
        self.etages.iter().map(|f| f.lots.len()).sum()
    }

    /// Nombre de lots portant un indice privatif
    pub fn private_lot_count(&self) -> usize {
        self.etages.iter().map(|f| f.private_lots().count()).sum()
    }
}

/// Résultat du parsing d'un export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub title: Title,

    /// Anomalies non fatales rencontrées, dans l'ordre des lignes
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Diagnostics des lignes écartées
    pub fn skipped(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Skipped)
    }

    /// Diagnostics des lignes conservées avec dégradation
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Gravité d'un diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// La ligne (ou l'étage) a été écartée
    Skipped,
    /// La ligne est conservée malgré une incohérence
    Warning,
}

/// Champ numérique d'une ligne de lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SurfaceField {
    Interieure,
    AvecSurplomb,
}

impl std::fmt::Display for SurfaceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceField::Interieure => write!(f, "surface intérieure"),
            SurfaceField::AvecSurplomb => write!(f, "surface avec surplomb"),
        }
    }
}

/// Raison d'un diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// Aucun marqueur "Titre foncier" dans le fichier
    TitleNotFound,
    /// Aucun marqueur "Propriété dite" après le titre
    HeaderNotFound,
    /// Ligne de lot sans indice privatif ni indice commun
    MissingIndex,
    /// Surface négative: la ligne est écartée
    NegativeSurface { field: SurfaceField, value: String },
    /// Surface non vide mais illisible: la ligne est écartée
    InvalidNumber { field: SurfaceField, value: String },
    /// Surface au-delà de `numeric::MAX_SURFACE`: la ligne est écartée
    SurfaceOutOfRange { field: SurfaceField, value: String },
    /// Surface avec surplomb inférieure à la surface intérieure
    SurplombBelowInterior,
    /// Étage sans aucun lot retenu
    EmptyFloor { nom: String },
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::TitleNotFound => write!(f, "no \"Titre foncier\" marker found"),
            DiagnosticKind::HeaderNotFound => write!(f, "no \"Propriété dite\" marker found"),
            DiagnosticKind::MissingIndex => write!(f, "lot row without private or common index"),
            DiagnosticKind::NegativeSurface { field, value } => {
                write!(f, "negative {}: {:?}", field, value)
            }
            DiagnosticKind::InvalidNumber { field, value } => {
                write!(f, "unparseable {}: {:?}", field, value)
            }
            DiagnosticKind::SurfaceOutOfRange { field, value } => {
                write!(f, "{} out of range: {:?}", field, value)
            }
            DiagnosticKind::SurplombBelowInterior => {
                write!(f, "surface avec surplomb lower than surface intérieure")
            }
            DiagnosticKind::EmptyFloor { nom } => write!(f, "floor {:?} has no lot, dropped", nom),
        }
    }
}

/// Anomalie rattachée à une ligne de l'entrée
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Numéro de ligne (1 = première ligne lue), 0 si l'anomalie porte sur tout le fichier
    pub row: usize,

    pub severity: Severity,

    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn skipped(row: usize, kind: DiagnosticKind) -> Self {
        Self {
            row,
            severity: Severity::Skipped,
            kind,
        }
    }

    pub fn warning(row: usize, kind: DiagnosticKind) -> Self {
        Self {
            row,
            severity: Severity::Warning,
            kind,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.row == 0 {
            write!(f, "{:?}: {}", self.severity, self.kind)
        } else {
            write!(f, "row {}: {:?}: {}", self.row, self.severity, self.kind)
        }
    }
}
