//! Arithmétique décimale à virgule fixe
//!
//! Toutes les surfaces et parts calculées sont des [`Decimal`]: aucune valeur
//! ne transite par un flottant binaire, sauf en dernier recours pour lire une
//! notation scientifique.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Surface maximale acceptée pour un lot (m²).
///
/// Au-delà, la ligne est écartée. Avec cette borne, les sommes de surfaces et
/// les produits du calcul des parts restent représentables en [`Decimal`].
pub const MAX_SURFACE: u64 = 1_000_000_000;

/// Parse une cellule en décimal, indépendamment de la locale ("50.5", "+4", "1e2").
///
/// Retourne `None` si la cellule est vide, illisible ou non finie.
/// La virgule décimale ("50,5") n'est pas acceptée.
pub fn parse_decimal(cell: &str) -> Option<Decimal> {
    let value = cell.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(d) = Decimal::from_str(value) {
        return Some(d);
    }

    // Notation scientifique et formes abrégées (".5", "5.")
    fast_float::parse::<f64, _>(value)
        .ok()
        .and_then(Decimal::from_f64)
}

/// Arrondi "half-up" à `dp` décimales.
///
/// Les valeurs manipulées sont positives: l'arrondi au plus loin de zéro sur
/// le point milieu est l'arrondi commercial attendu.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Formate avec exactement `dp` décimales, après arrondi half-up
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_up(value, dp);
    rounded.rescale(dp);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal_plain() {
        assert_eq!(parse_decimal("50.5"), Some(dec("50.5")));
        assert_eq!(parse_decimal("  55.0 "), Some(dec("55.0")));
        assert_eq!(parse_decimal("40"), Some(dec("40")));
    }

    #[test]
    fn test_parse_decimal_scientific() {
        assert_eq!(parse_decimal("1e2"), Some(dec("100")));
        assert_eq!(parse_decimal("2.5E1"), Some(dec("25")));
    }

    #[test]
    fn test_parse_decimal_absent() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("50,5"), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("nan"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(dec("0.125"), 2), dec("0.13"));
        assert_eq!(round_half_up(dec("0.124"), 2), dec("0.12"));
        assert_eq!(round_half_up(dec("2.5"), 0), dec("3"));
        assert_eq!(round_half_up(dec("33.333333"), 2), dec("33.33"));
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(dec("100"), 2), "100.00");
        assert_eq!(format_fixed(dec("27.5"), 2), "27.50");
        assert_eq!(format_fixed(dec("2749.995"), 2), "2750.00");
        assert_eq!(format_fixed(dec("1666.5"), 0), "1667");
    }
}
