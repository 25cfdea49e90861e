//! Tableau des contenances de la copropriété (TA)
//!
//! Liste des lots privatifs avec leurs deux surfaces. N'utilise pas le calcul
//! des parts: les totaux sont des sommes exactes des surfaces.

use rust_decimal::Decimal;
use titre_foncier::Title;

use super::{
    exposant, header_block, total_row, Column, ReportKind, BODY_CENTERED, BODY_DECIMAL,
    BODY_TEXT,
};
use crate::grid::{Content, Emphasis, Grid};

const COLUMNS: [Column; 7] = [
    Column { header: "Niveau", width: 22.0 },
    Column { header: "Cotes", width: 30.0 },
    Column { header: "Indice privatif", width: 14.0 },
    Column { header: "Consistance", width: 24.0 },
    Column { header: "Surface intérieure (m²)", width: 16.0 },
    Column { header: "Surface avec surplomb (m²)", width: 16.0 },
    Column { header: "Observations", width: 28.0 },
];

pub fn render(title: &Title) -> Grid {
    let kind = ReportKind::Contenances;
    let mut grid = Grid::new(kind.code());
    let mut row = header_block(&mut grid, kind, title, &COLUMNS);

    let mut total_interieure = Decimal::ZERO;
    let mut total_surplomb = Decimal::ZERO;

    for floor in &title.etages {
        let first = row;
        let mut interieure = Decimal::ZERO;
        let mut surplomb = Decimal::ZERO;

        for lot in floor.private_lots() {
            if row == first {
                grid.text(row, 0, floor.nom.as_str(), BODY_CENTERED);
                grid.text(row, 1, floor.cotes.as_str(), BODY_CENTERED);
            }
            grid.text(
                row,
                2,
                exposant(lot.indice_privative.as_deref().unwrap_or_default()),
                BODY_CENTERED,
            );
            grid.text(row, 3, lot.consistance.as_str(), BODY_TEXT);
            grid.number(row, 4, lot.surface_interieure, BODY_DECIMAL);
            grid.number(row, 5, lot.surface_avec_surplomb, BODY_DECIMAL);
            grid.text(
                row,
                6,
                exposant(lot.observations.as_deref().unwrap_or_default()),
                BODY_TEXT,
            );
            interieure = interieure.saturating_add(lot.surface_interieure);
            surplomb = surplomb.saturating_add(lot.surface_avec_surplomb);
            row += 1;
        }
        let span = row - first;
        grid.merge_rows(0, first, span);
        grid.merge_rows(1, first, span);

        let has_lots = span > 0;
        total_row(
            &mut grid,
            row,
            Emphasis::Subtotal,
            format!("Total {}", floor.nom),
            4,
            &[
                (has_lots.then_some(interieure), Content::Decimal2),
                (has_lots.then_some(surplomb), Content::Decimal2),
                (None, Content::Text),
            ],
        );
        total_interieure = total_interieure.saturating_add(interieure);
        total_surplomb = total_surplomb.saturating_add(surplomb);
        row += 1;
    }

    total_row(
        &mut grid,
        row,
        Emphasis::Total,
        "Total général".to_string(),
        4,
        &[
            (Some(total_interieure), Content::Decimal2),
            (Some(total_surplomb), Content::Decimal2),
            (None, Content::Text),
        ],
    );

    grid
}
