//! Tableau récapitulatif des superficies totales par consistance (TR-C)
//!
//! Une ligne par consistance, tous étages et tous lots confondus (communs
//! compris), dans l'ordre de première apparition. Deux consistances qui ne
//! diffèrent que par la casse ou les blancs sont regroupées.

use rust_decimal::Decimal;
use titre_foncier::{Lot, Title};

use super::{header_block, total_row, Column, ReportKind, BODY_DECIMAL, BODY_INTEGER, BODY_TEXT};
use crate::grid::{Content, Emphasis, Grid};

const COLUMNS: [Column; 4] = [
    Column { header: "Consistance", width: 30.0 },
    Column { header: "Nombre de lots", width: 12.0 },
    Column { header: "Surface intérieure (m²)", width: 16.0 },
    Column { header: "Surface avec surplomb (m²)", width: 16.0 },
];

/// Libellé des lots sans consistance
const NON_RENSEIGNEE: &str = "Non renseignée";

/// Cumul d'une consistance
#[derive(Debug)]
struct Group {
    key: String,
    label: String,
    lots: usize,
    interieure: Decimal,
    surplomb: Decimal,
}

impl Group {
    fn add(&mut self, lot: &Lot) {
        self.lots += 1;
        self.interieure = self.interieure.saturating_add(lot.surface_interieure);
        self.surplomb = self.surplomb.saturating_add(lot.surface_avec_surplomb);
    }
}

/// Regroupe les lots du titre par consistance
fn groups(title: &Title) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for lot in title.etages.iter().flat_map(|f| &f.lots) {
        let label = lot.consistance.trim();
        let key = label.to_lowercase();
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.add(lot),
            None => {
                let mut group = Group {
                    label: if label.is_empty() {
                        NON_RENSEIGNEE.to_string()
                    } else {
                        label.to_string()
                    },
                    key,
                    lots: 0,
                    interieure: Decimal::ZERO,
                    surplomb: Decimal::ZERO,
                };
                group.add(lot);
                groups.push(group);
            }
        }
    }
    groups
}

pub fn render(title: &Title) -> Grid {
    let kind = ReportKind::Consistances;
    let mut grid = Grid::new(kind.code());
    let mut row = header_block(&mut grid, kind, title, &COLUMNS);

    let mut lots = 0usize;
    let mut total_interieure = Decimal::ZERO;
    let mut total_surplomb = Decimal::ZERO;

    for group in groups(title) {
        grid.text(row, 0, group.label, BODY_TEXT);
        grid.number(row, 1, Decimal::from(group.lots), BODY_INTEGER);
        grid.number(row, 2, group.interieure, BODY_DECIMAL);
        grid.number(row, 3, group.surplomb, BODY_DECIMAL);

        lots += group.lots;
        total_interieure = total_interieure.saturating_add(group.interieure);
        total_surplomb = total_surplomb.saturating_add(group.surplomb);
        row += 1;
    }

    total_row(
        &mut grid,
        row,
        Emphasis::Total,
        "Total général".to_string(),
        1,
        &[
            (Some(Decimal::from(lots)), Content::Integer),
            (Some(total_interieure), Content::Decimal2),
            (Some(total_surplomb), Content::Decimal2),
        ],
    );

    grid
}
