//! Tableau de répartition des quotes-parts et des tantièmes d'indivision
//!
//! ```text
//! Niveau | Surface intérieure du niveau | Indice privatif | Surface avec surplomb | Quote-part | Indivision
//! ```
//!
//! Le nom de l'étage et sa surface intérieure sont fusionnés sur les lignes
//! des lots privatifs de l'étage.

use titre_foncier::Title;

use super::{
    exposant, header_block, total_row, Column, ReportKind, BODY_CENTERED, BODY_DECIMAL,
    BODY_INTEGER,
};
use crate::grid::{Content, Emphasis, Grid};
use crate::shares::ShareTable;

const COLUMNS: [Column; 6] = [
    Column { header: "Niveau", width: 24.0 },
    Column { header: "Surface intérieure du niveau (m²)", width: 18.0 },
    Column { header: "Indice privatif", width: 14.0 },
    Column { header: "Surface avec surplomb (m²)", width: 18.0 },
    Column { header: "Quote-part", width: 14.0 },
    Column { header: "Tantièmes d'indivision (/10000)", width: 18.0 },
];

pub fn render(title: &Title, shares: &ShareTable) -> Grid {
    let kind = ReportKind::QuotePart;
    let mut grid = Grid::new(kind.code());
    let mut row = header_block(&mut grid, kind, title, &COLUMNS);

    for (floor, floor_shares) in title.etages.iter().zip(&shares.floors) {
        let first = row;
        for share in &floor_shares.lots {
            let lot = &floor.lots[share.lot_index];
            if row == first {
                grid.text(row, 0, floor.nom.as_str(), BODY_CENTERED);
                grid.number(row, 1, floor.total_surface_interieure, BODY_DECIMAL);
            }
            grid.text(
                row,
                2,
                exposant(lot.indice_privative.as_deref().unwrap_or_default()),
                BODY_CENTERED,
            );
            grid.number(row, 3, share.surface_avec_surplomb, BODY_DECIMAL);
            grid.number(row, 4, share.quote_part, BODY_DECIMAL);
            grid.number(row, 5, share.indivision, BODY_INTEGER);
            row += 1;
        }
        let span = row - first;
        grid.merge_rows(0, first, span);
        grid.merge_rows(1, first, span);

        let subtotal = floor_shares.subtotal.as_ref();
        total_row(
            &mut grid,
            row,
            Emphasis::Subtotal,
            format!("Total {}", floor.nom),
            3,
            &[
                (subtotal.map(|s| s.surface_avec_surplomb), Content::Decimal2),
                (subtotal.map(|s| s.quote_part), Content::Decimal2),
                (subtotal.map(|s| s.indivision), Content::Integer),
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
            (Some(shares.total.quote_part), Content::Decimal2),
            (Some(shares.total.indivision), Content::Integer),
        ],
    );

    grid
}
