//! Calcul des voix, quotes-parts et tantièmes d'indivision
//!
//! Seuls les lots portant un indice privatif participent. Pour un lot `i`
//! de surface avec surplomb `Si`, sur l'étage `f`, avec `S` la somme des
//! surfaces avec surplomb de tous les lots privatifs:
//!
//! ```text
//! Nvi      = Si × 100 / S                         (2 décimales)
//! quot_i   = Si × SurfaceIntérieure(f) / S        (2 décimales)
//! indiv_i  = Si × 10000 / S                       (entier)
//! ```
//!
//! Chaque valeur est calculée à partir des surfaces exactes (S et les
//! surfaces d'étage ne sont jamais arrondies) puis arrondie une seule fois
//! (half-up). Les sous-totaux et totaux additionnent les valeurs affichées,
//! donc arrondies: un total est toujours égal à la somme des lignes qu'il
//! résume, et peut s'écarter de 100 / 10000 de l'erreur d'arrondi cumulée
//! (trois lots égaux: 33.33 × 3 = 99.99).
//!
//! Toute l'arithmétique est vérifiée: un dépassement de capacité de
//! [`Decimal`] donne `ShareError::Overflow`.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use titre_foncier::numeric::round_half_up;
use titre_foncier::{Floor, Lot, Title};

/// Décimales du nombre de voix (%)
pub const VOIX_SCALE: u32 = 2;
/// Décimales de la quote-part
pub const QUOTE_PART_SCALE: u32 = 2;
/// Décimales des tantièmes d'indivision
pub const INDIVISION_SCALE: u32 = 0;

/// Base des tantièmes d'indivision
const INDIVISION_BASE: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// Aucun lot privatif, ou des lots privatifs de surface nulle: S = 0
    #[error("No shares to compute: total surface of private lots is zero")]
    NoPrivateSurface,

    /// Surfaces trop grandes pour être multipliées ou cumulées
    #[error("Share computation overflowed on {0}")]
    Overflow(&'static str),
}

/// Parts calculées d'un lot privatif
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotShare {
    /// Position du lot dans `Floor::lots`
    pub lot_index: usize,
    pub surface_interieure: Decimal,
    pub surface_avec_surplomb: Decimal,
    /// Nombre de voix (%)
    pub voix: Decimal,
    pub quote_part: Decimal,
    /// Tantièmes d'indivision (/10000)
    pub indivision: Decimal,
}

/// Cumul des colonnes numériques
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareTotals {
    pub surface_interieure: Decimal,
    pub surface_avec_surplomb: Decimal,
    pub voix: Decimal,
    pub quote_part: Decimal,
    pub indivision: Decimal,
}

fn checked_add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, ShareError> {
    a.checked_add(b).ok_or(ShareError::Overflow(what))
}

impl ShareTotals {
    fn add_lot(&mut self, share: &LotShare) -> Result<(), ShareError> {
        self.add(&ShareTotals {
            surface_interieure: share.surface_interieure,
            surface_avec_surplomb: share.surface_avec_surplomb,
            voix: share.voix,
            quote_part: share.quote_part,
            indivision: share.indivision,
        })
    }

    fn add(&mut self, other: &ShareTotals) -> Result<(), ShareError> {
        self.surface_interieure = checked_add(
            self.surface_interieure,
            other.surface_interieure,
            "surface intérieure",
        )?;
        self.surface_avec_surplomb = checked_add(
            self.surface_avec_surplomb,
            other.surface_avec_surplomb,
            "surface avec surplomb",
        )?;
        self.voix = checked_add(self.voix, other.voix, "voix")?;
        self.quote_part = checked_add(self.quote_part, other.quote_part, "quote-part")?;
        self.indivision = checked_add(self.indivision, other.indivision, "indivision")?;
        Ok(())
    }
}

/// Parts des lots privatifs d'un étage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorShares {
    /// Parts des lots privatifs, dans l'ordre de l'étage
    pub lots: Vec<LotShare>,

    /// Sous-total de l'étage; `None` si l'étage n'a aucun lot privatif
    pub subtotal: Option<ShareTotals>,
}

/// Parts de tout le titre, étage par étage (même ordre que `Title::etages`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareTable {
    /// S: somme des surfaces avec surplomb des lots privatifs
    pub surface_privative_totale: Decimal,

    pub floors: Vec<FloorShares>,

    /// Somme des sous-totaux d'étage
    pub total: ShareTotals,
}

/// Calcule les parts de tous les lots privatifs du titre.
///
/// # Errors
///
/// - `ShareError::NoPrivateSurface` si la surface privative totale est nulle.
/// - `ShareError::Overflow` si un produit ou une somme dépasse la capacité
///   de [`Decimal`].
pub fn compute(title: &Title) -> Result<ShareTable, ShareError> {
    let s = title
        .etages
        .iter()
        .flat_map(Floor::private_lots)
        .try_fold(Decimal::ZERO, |acc, lot| {
            checked_add(acc, lot.surface_avec_surplomb, "S")
        })?;

    if s.is_zero() {
        return Err(ShareError::NoPrivateSurface);
    }

    let mut total = ShareTotals::default();
    let mut floors = Vec::with_capacity(title.etages.len());
    for floor in &title.etages {
        let shares = floor_shares(floor, s)?;
        if let Some(subtotal) = &shares.subtotal {
            total.add(subtotal)?;
        }
        floors.push(shares);
    }

    debug!(
        surface = %s,
        voix = %total.voix,
        indivision = %total.indivision,
        "Shares computed"
    );

    Ok(ShareTable {
        surface_privative_totale: s,
        floors,
        total,
    })
}

fn floor_shares(floor: &Floor, s: Decimal) -> Result<FloorShares, ShareError> {
    let lots = floor
        .lots
        .iter()
        .enumerate()
        .filter(|(_, lot)| lot.is_private())
        .map(|(index, lot)| lot_share(index, lot, floor.total_surface_interieure, s))
        .collect::<Result<Vec<LotShare>, ShareError>>()?;

    let subtotal = if lots.is_empty() {
        None
    } else {
        let mut subtotal = ShareTotals::default();
        for share in &lots {
            subtotal.add_lot(share)?;
        }
        Some(subtotal)
    };

    Ok(FloorShares { lots, subtotal })
}

/// `si × factor / s`, arrondi à `dp` décimales
fn ratio(
    si: Decimal,
    factor: Decimal,
    s: Decimal,
    dp: u32,
    what: &'static str,
) -> Result<Decimal, ShareError> {
    si.checked_mul(factor)
        .and_then(|product| product.checked_div(s))
        .map(|value| round_half_up(value, dp))
        .ok_or(ShareError::Overflow(what))
}

fn lot_share(
    index: usize,
    lot: &Lot,
    floor_interieure: Decimal,
    s: Decimal,
) -> Result<LotShare, ShareError> {
    let si = lot.surface_avec_surplomb;
    Ok(LotShare {
        lot_index: index,
        surface_interieure: lot.surface_interieure,
        surface_avec_surplomb: si,
        voix: ratio(si, Decimal::ONE_HUNDRED, s, VOIX_SCALE, "voix")?,
        quote_part: ratio(si, floor_interieure, s, QUOTE_PART_SCALE, "quote-part")?,
        indivision: ratio(
            si,
            Decimal::from(INDIVISION_BASE),
            s,
            INDIVISION_SCALE,
            "indivision",
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn lot(indice: Option<&str>, interieure: &str, surplomb: &str) -> Lot {
        Lot {
            propriete: String::new(),
            titre_num: String::new(),
            indice_privative: indice.map(str::to_string),
            indice_commune: Some("c".to_string()),
            surface_interieure: dec(interieure),
            surface_avec_surplomb: dec(surplomb),
            consistance: "Appartement".to_string(),
            observations: None,
        }
    }

    fn title(floors: Vec<Vec<Lot>>) -> Title {
        Title {
            titre_foncier: "1/1".to_string(),
            propriete_nom: String::new(),
            etages: floors
                .into_iter()
                .enumerate()
                .map(|(i, lots)| Floor::new(format!("Etage {}", i), String::new(), lots))
                .collect(),
        }
    }

    #[test]
    fn test_two_floors_voix() {
        let t = title(vec![
            vec![lot(Some("1"), "40", "40"), lot(Some("2"), "60", "60")],
            vec![lot(Some("3"), "50", "50"), lot(Some("4"), "50", "50")],
        ]);
        let table = compute(&t).unwrap();

        let voix: Vec<Decimal> = table
            .floors
            .iter()
            .flat_map(|f| f.lots.iter().map(|l| l.voix))
            .collect();
        assert_eq!(voix, vec![dec("20.00"), dec("30.00"), dec("25.00"), dec("25.00")]);
        assert_eq!(table.total.voix, dec("100.00"));
        assert_eq!(table.surface_privative_totale, dec("200"));
        assert_eq!(table.total.indivision, dec("10000"));
    }

    #[test]
    fn test_quote_part_uses_floor_interior_of_all_lots() {
        // L'étage compte un lot commun de 20 m²: surface intérieure de l'étage = 120
        let t = title(vec![vec![
            lot(Some("1"), "40", "50"),
            lot(Some("2"), "60", "150"),
            lot(None, "20", "20"),
        ]]);
        let table = compute(&t).unwrap();
        let shares = &table.floors[0].lots;

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[1].lot_index, 1);
        // 50 × 120 / 200 = 30
        assert_eq!(shares[0].quote_part, dec("30.00"));
        // 150 × 120 / 200 = 90
        assert_eq!(shares[1].quote_part, dec("90.00"));
        assert_eq!(shares[0].indivision, dec("2500"));
    }

    #[test]
    fn test_rounding_half_up() {
        // Trois lots égaux: 33.333… → 33.33, total 99.99
        let t = title(vec![vec![
            lot(Some("1"), "1", "1"),
            lot(Some("2"), "1", "1"),
            lot(Some("3"), "1", "1"),
        ]]);
        let table = compute(&t).unwrap();

        assert_eq!(table.floors[0].lots[0].voix, dec("33.33"));
        assert_eq!(table.floors[0].lots[0].indivision, dec("3333"));
        assert_eq!(table.total.voix, dec("99.99"));

        // 1 / 16 → 6.25 %, 625 tantièmes
        let t = title(vec![vec![lot(Some("1"), "1", "1"), lot(Some("2"), "15", "15")]]);
        let table = compute(&t).unwrap();
        assert_eq!(table.floors[0].lots[0].voix, dec("6.25"));
        assert_eq!(table.floors[0].lots[0].indivision, dec("625"));

        // 1 / 6 × 10000 = 1666.66… → 1667; 5 / 6 × 10000 = 8333.33… → 8333
        let t = title(vec![vec![lot(Some("1"), "1", "1"), lot(Some("2"), "5", "5")]]);
        let table = compute(&t).unwrap();
        assert_eq!(table.floors[0].lots[0].indivision, dec("1667"));
        assert_eq!(table.floors[0].lots[1].indivision, dec("8333"));
        assert_eq!(table.floors[0].lots[0].voix, dec("16.67"));
    }

    #[test]
    fn test_normalization_tolerance() {
        let t = title(vec![
            vec![
                lot(Some("1"), "33.3", "37.1"),
                lot(Some("2"), "41.7", "45.9"),
                lot(None, "8", "8"),
            ],
            vec![
                lot(Some("3"), "72.05", "80.15"),
                lot(Some("4"), "12.4", "13.0"),
                lot(Some("5"), "99.99", "101.01"),
            ],
        ]);
        let table = compute(&t).unwrap();
        let n = Decimal::from(t.private_lot_count() as u64);

        let voix_gap = (table.total.voix - Decimal::ONE_HUNDRED).abs();
        assert!(voix_gap <= dec("0.01") * n, "voix total {}", table.total.voix);

        let indiv_gap = (table.total.indivision - Decimal::from(10_000)).abs();
        assert!(indiv_gap <= dec("0.5") * n, "indivision total {}", table.total.indivision);
    }

    #[test]
    fn test_floor_without_private_lots_has_no_subtotal() {
        let t = title(vec![
            vec![lot(None, "10", "10")],
            vec![lot(Some("1"), "10", "10")],
        ]);
        let table = compute(&t).unwrap();

        assert!(table.floors[0].lots.is_empty());
        assert_eq!(table.floors[0].subtotal, None);
        assert_eq!(table.total.voix, dec("100.00"));
        // Les surfaces communes ne comptent pas dans S
        assert_eq!(table.surface_privative_totale, dec("10"));
    }

    #[test]
    fn test_totals_are_sum_of_subtotals() {
        let t = title(vec![
            vec![lot(Some("1"), "10", "13"), lot(Some("2"), "20", "17")],
            vec![lot(Some("3"), "30", "31")],
        ]);
        let table = compute(&t).unwrap();

        let mut sum = ShareTotals::default();
        for floor in &table.floors {
            sum.add(floor.subtotal.as_ref().unwrap()).unwrap();
        }
        assert_eq!(sum, table.total);
    }

    #[test]
    fn test_zero_private_surface() {
        let no_private = title(vec![vec![lot(None, "10", "10")]]);
        assert_eq!(compute(&no_private), Err(ShareError::NoPrivateSurface));

        let zero_surface = title(vec![vec![lot(Some("1"), "0", "0")]]);
        assert_eq!(compute(&zero_surface), Err(ShareError::NoPrivateSurface));

        assert_eq!(compute(&Title::default()), Err(ShareError::NoPrivateSurface));
    }

    #[test]
    fn test_overflow_is_an_error() {
        // 1e15 × 1e15 (quote-part) dépasse la capacité de Decimal
        let t = title(vec![vec![lot(
            Some("1"),
            "1000000000000000",
            "1000000000000000",
        )]]);
        assert_eq!(compute(&t), Err(ShareError::Overflow("quote-part")));

        // S lui-même n'est pas représentable
        let t = title(vec![vec![
            lot(Some("1"), "1", "50000000000000000000000000000"),
            lot(Some("2"), "1", "50000000000000000000000000000"),
        ]]);
        assert_eq!(compute(&t), Err(ShareError::Overflow("S")));
    }

    #[test]
    fn test_compute_does_not_mutate_title() {
        let t = title(vec![vec![lot(Some("1"), "10", "10")]]);
        let before = t.clone();
        compute(&t).unwrap();
        compute(&t).unwrap();
        assert_eq!(t, before);
    }
}
