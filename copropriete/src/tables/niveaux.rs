//! Tableau détaillé des superficies par niveau (TR-N)
//!
//! Tous les lots sont listés, communs compris. Après les lots de chaque
//! étage viennent une ligne par catégorie de consistance présente
//! (commerces, appartements) puis le total de l'étage.

use rust_decimal::Decimal;
use titre_foncier::{Floor, Lot, Title};

use super::{
    exposant, header_block, total_row, Column, ReportKind, BODY_CENTERED, BODY_DECIMAL,
    BODY_TEXT,
};
use crate::grid::{Content, Emphasis, Grid, RowNum};

const COLUMNS: [Column; 8] = [
    Column { header: "Niveau", width: 22.0 },
    Column { header: "Propriété", width: 22.0 },
    Column { header: "Indice privatif", width: 12.0 },
    Column { header: "Indice commun", width: 12.0 },
    Column { header: "Consistance", width: 24.0 },
    Column { header: "Surface intérieure (m²)", width: 16.0 },
    Column { header: "Surface avec surplomb (m²)", width: 16.0 },
    Column { header: "Observations", width: 28.0 },
];

/// Colonnes couvertes par le libellé des lignes de synthèse
const LABEL_COLS: u16 = 5;

/// Regroupement par mot-clé de consistance
struct Category {
    label: &'static str,
    keyword: &'static str,
}

const CATEGORIES: [Category; 2] = [
    Category {
        label: "Commerces",
        keyword: "commerc",
    },
    Category {
        label: "Appartements",
        keyword: "appartement",
    },
];

impl Category {
    fn matches(&self, lot: &Lot) -> bool {
        lot.consistance.to_lowercase().contains(self.keyword)
    }
}

pub fn render(title: &Title) -> Grid {
    let kind = ReportKind::Niveaux;
    let mut grid = Grid::new(kind.code());
    let mut row = header_block(&mut grid, kind, title, &COLUMNS);

    let mut total_interieure = Decimal::ZERO;
    let mut total_surplomb = Decimal::ZERO;

    for floor in &title.etages {
        row = floor_lots(&mut grid, row, floor);

        for category in &CATEGORIES {
            let lots: Vec<&Lot> = floor.lots.iter().filter(|l| category.matches(l)).collect();
            if lots.is_empty() {
                continue;
            }
            total_row(
                &mut grid,
                row,
                Emphasis::Category,
                format!("{} ({})", category.label, lots.len()),
                LABEL_COLS,
                &[
                    (
                        Some(saturating_sum(lots.iter().map(|l| &l.surface_interieure))),
                        Content::Decimal2,
                    ),
                    (
                        Some(saturating_sum(lots.iter().map(|l| &l.surface_avec_surplomb))),
                        Content::Decimal2,
                    ),
                    (None, Content::Text),
                ],
            );
            row += 1;
        }

        total_row(
            &mut grid,
            row,
            Emphasis::Subtotal,
            format!("Total {}", floor.nom),
            LABEL_COLS,
            &[
                (Some(floor.total_surface_interieure), Content::Decimal2),
                (Some(floor.total_surface_avec_surplomb), Content::Decimal2),
                (None, Content::Text),
            ],
        );
        total_interieure = total_interieure.saturating_add(floor.total_surface_interieure);
        total_surplomb = total_surplomb.saturating_add(floor.total_surface_avec_surplomb);
        row += 1;
    }

    total_row(
        &mut grid,
        row,
        Emphasis::Total,
        "Total général".to_string(),
        LABEL_COLS,
        &[
            (Some(total_interieure), Content::Decimal2),
            (Some(total_surplomb), Content::Decimal2),
            (None, Content::Text),
        ],
    );

    grid
}

fn saturating_sum<'a>(values: impl Iterator<Item = &'a Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
}

/// Écrit les lignes de lots d'un étage et retourne la ligne suivante
fn floor_lots(grid: &mut Grid, first: RowNum, floor: &Floor) -> RowNum {
    let mut row = first;
    for lot in &floor.lots {
        if row == first {
            grid.text(row, 0, floor.nom.as_str(), BODY_CENTERED);
        }
        grid.text(row, 1, lot.propriete.as_str(), BODY_TEXT);
        grid.text(
            row,
            2,
            exposant(lot.indice_privative.as_deref().unwrap_or_default()),
            BODY_CENTERED,
        );
        grid.text(
            row,
            3,
            exposant(lot.indice_commune.as_deref().unwrap_or_default()),
            BODY_CENTERED,
        );
        grid.text(row, 4, lot.consistance.as_str(), BODY_TEXT);
        grid.number(row, 5, lot.surface_interieure, BODY_DECIMAL);
        grid.number(row, 6, lot.surface_avec_surplomb, BODY_DECIMAL);
        grid.text(
            row,
            7,
            exposant(lot.observations.as_deref().unwrap_or_default()),
            BODY_TEXT,
        );
        row += 1;
    }
    grid.merge_rows(0, first, row - first);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn lot(consistance: &str, commune: &str, surface: &str) -> Lot {
        Lot {
            propriete: "Lot".to_string(),
            titre_num: String::new(),
            indice_privative: None,
            indice_commune: Some(commune.to_string()),
            surface_interieure: dec(surface),
            surface_avec_surplomb: dec(surface),
            consistance: consistance.to_string(),
            observations: None,
        }
    }

    #[test]
    fn test_niveaux_categories() {
        let title = Title {
            titre_foncier: "1/1".to_string(),
            propriete_nom: String::new(),
            etages: vec![
                Floor::new(
                    "RDC".to_string(),
                    String::new(),
                    vec![
                        lot("Local COMMERCIAL", "1", "40"),
                        lot("Commerce", "2", "20"),
                        lot("Hall", "ca", "10"),
                    ],
                ),
                Floor::new(
                    "Etage".to_string(),
                    String::new(),
                    vec![lot("Appartement", "3", "70")],
                ),
            ],
        };
        let grid = render(&title);

        // Tous les lots listés, niveau fusionné sur les 3 lignes
        assert_eq!(grid.merge_anchored_at(5, 0).map(|m| m.row_span()), Some(3));
        assert_eq!(grid.text_at(7, 3), Some("c\u{1D43}"));

        // RDC: une ligne Commerces, pas de ligne Appartements
        assert_eq!(grid.text_at(8, 0), Some("Commerces (2)"));
        assert_eq!(grid.number_at(8, 5), Some(dec("60")));
        assert_eq!(grid.text_at(9, 0), Some("Total RDC"));
        assert_eq!(grid.number_at(9, 5), Some(dec("70")));

        assert_eq!(grid.text_at(10, 0), Some("Etage"));
        assert!(grid.merge_anchored_at(10, 0).is_none());
        assert_eq!(grid.text_at(11, 0), Some("Appartements (1)"));
        assert_eq!(grid.text_at(12, 0), Some("Total Etage"));

        assert_eq!(grid.text_at(13, 0), Some("Total général"));
        assert_eq!(grid.number_at(13, 6), Some(dec("140")));
        assert_eq!(grid.find_row(0, "Appartements (0)"), None);
    }
}
