//! Tableau du nombre de voix des copropriétaires
//!
//! ```text
//! Niveau | Indice privatif | Consistance | Surface avec surplomb | Nombre de voix (%)
//! ```

use titre_foncier::Title;

use super::{
    exposant, header_block, total_row, Column, ReportKind, BODY_CENTERED, BODY_DECIMAL,
    BODY_TEXT,
};
use crate::grid::{Content, Emphasis, Grid};
use crate::shares::ShareTable;

const COLUMNS: [Column; 5] = [
    Column { header: "Niveau", width: 24.0 },
    Column { header: "Indice privatif", width: 14.0 },
    Column { header: "Consistance", width: 26.0 },
    Column { header: "Surface avec surplomb (m²)", width: 18.0 },
    Column { header: "Nombre de voix (%)", width: 16.0 },
];

pub fn render(title: &Title, shares: &ShareTable) -> Grid {
    let kind = ReportKind::Voix;
    let mut grid = Grid::new(kind.code());
    let mut row = header_block(&mut grid, kind, title, &COLUMNS);

    for (floor, floor_shares) in title.etages.iter().zip(&shares.floors) {
        let first = row;
        for share in &floor_shares.lots {
            let lot = &floor.lots[share.lot_index];
            if row == first {
                grid.text(row, 0, floor.nom.as_str(), BODY_CENTERED);
            }
            grid.text(
                row,
                1,
                exposant(lot.indice_privative.as_deref().unwrap_or_default()),
                BODY_CENTERED,
            );
            grid.text(row, 2, lot.consistance.as_str(), BODY_TEXT);
            grid.number(row, 3, share.surface_avec_surplomb, BODY_DECIMAL);
            grid.number(row, 4, share.voix, BODY_DECIMAL);
            row += 1;
        }
        grid.merge_rows(0, first, row - first);

        let subtotal = floor_shares.subtotal.as_ref();
        total_row(
            &mut grid,
            row,
            Emphasis::Subtotal,
            format!("Total {}", floor.nom),
            3,
            &[
                (subtotal.map(|s| s.surface_avec_surplomb), Content::Decimal2),
                (subtotal.map(|s| s.voix), Content::Decimal2),
            ],
        );
        row += 1;
    }

    total_row(
        &mut grid,
        row,
        Emphasis::Total,
        "Total général".to_string(),
        3,
        &[
            (Some(shares.total.surface_avec_surplomb), Content::Decimal2),
            (Some(shares.total.voix), Content::Decimal2),
        ],
    );

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shares;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use titre_foncier::{Floor, Lot};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn lot(indice: Option<&str>, surplomb: &str) -> Lot {
        Lot {
            propriete: String::new(),
            titre_num: String::new(),
            indice_privative: indice.map(str::to_string),
            indice_commune: Some("1".to_string()),
            surface_interieure: dec(surplomb),
            surface_avec_surplomb: dec(surplomb),
            consistance: "Appartement".to_string(),
            observations: None,
        }
    }

    fn sample() -> Title {
        Title {
            titre_foncier: "154311 /05".to_string(),
            propriete_nom: "Villa".to_string(),
            etages: vec![
                Floor::new(
                    "RDC".to_string(),
                    String::new(),
                    vec![lot(Some("1a"), "40"), lot(Some("2"), "60")],
                ),
                Floor::new("Cave".to_string(), String::new(), vec![lot(None, "12")]),
                Floor::new(
                    "Etage 1".to_string(),
                    String::new(),
                    vec![lot(Some("3"), "100")],
                ),
            ],
        }
    }

    #[test]
    fn test_voix_layout() {
        let title = sample();
        let grid = render(&title, &shares::compute(&title).unwrap());

        assert_eq!(grid.text_at(5, 0), Some("RDC"));
        assert_eq!(grid.text_at(5, 1), Some("1\u{1D43}"));
        assert_eq!(grid.number_at(5, 4), Some(dec("20.00")));
        assert_eq!(grid.number_at(6, 4), Some(dec("30.00")));
        assert_eq!(grid.merge_anchored_at(5, 0).map(|m| m.row_span()), Some(2));

        assert_eq!(grid.text_at(7, 0), Some("Total RDC"));
        assert_eq!(grid.number_at(7, 4), Some(dec("50.00")));

        // Étage sans lot privatif: sous-total vide, libellé fusionné sur une seule ligne
        assert_eq!(grid.text_at(8, 0), Some("Total Cave"));
        assert_eq!(grid.number_at(8, 3), None);
        assert!(grid.merge_anchored_at(8, 0).is_some_and(|m| m.row_span() == 1));

        // Un seul lot: aucune fusion verticale
        assert_eq!(grid.text_at(9, 0), Some("Etage 1"));
        assert!(grid.merge_anchored_at(9, 0).is_none());

        assert_eq!(grid.text_at(11, 0), Some("Total général"));
        assert_eq!(grid.number_at(11, 3), Some(dec("200")));
        assert_eq!(grid.number_at(11, 4), Some(dec("100.00")));
        assert_eq!(grid.row_count(), 12);
    }
}
