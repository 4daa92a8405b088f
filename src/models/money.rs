// ============================================================================
// Montants : parsing et formatage
// ============================================================================
// chain.so renvoie les prix et les valeurs tantôt en string ("50000.5"),
// tantôt en nombre JSON (50000.5). On accepte les deux et on convertit en
// Decimal pour éviter les erreurs d'arrondi des f64.
// ============================================================================

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

/// Représentation JSON d'un nombre décimal : string, nombre, ou autre chose
///
/// CONCEPT RUST : #[serde(untagged)]
/// - Serde essaie chaque variant dans l'ordre
/// - Le premier qui matche gagne
/// - Other accepte tout (null, "", objet) : la validation est faite plus
///   tard, seulement sur les valeurs réellement utilisées
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum DecimalRepr {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl Default for DecimalRepr {
    fn default() -> Self {
        DecimalRepr::Other(serde_json::Value::Null)
    }
}

impl DecimalRepr {
    /// Texte tel que renvoyé par l'API
    pub(crate) fn into_text(self) -> String {
        match self {
            DecimalRepr::Text(text) => text,
            DecimalRepr::Number(number) => number.to_string(),
            DecimalRepr::Other(value) => value.to_string(),
        }
    }

    /// Valeur décimale, None si la valeur n'est pas un nombre
    pub(crate) fn to_decimal(&self) -> Option<Decimal> {
        match self {
            DecimalRepr::Text(text) => parse_decimal(text),
            DecimalRepr::Number(number) => parse_decimal(&number.to_string()),
            DecimalRepr::Other(_) => None,
        }
    }
}

/// Parse un décimal en notation classique ou scientifique ("1e-5")
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Formate un montant en dollars US : 50000.5 -> "$50,000.50"
///
/// Même rendu que Intl.NumberFormat("en-us", { style: "currency", currency: "USD" }) :
/// - séparateur de milliers ","
/// - toujours 2 décimales, arrondi "half away from zero"
/// - signe avant le "$" pour les montants négatifs
pub fn format_usd(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        group_thousands(integer),
        fraction
    )
}

/// Insère une virgule toutes les 3 chiffres en partant de la droite
fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        parse_decimal(text).unwrap()
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec("50000.5")), "$50,000.50");
        assert_eq!(format_usd(dec("0")), "$0.00");
        assert_eq!(format_usd(dec("999.999")), "$1,000.00");
        assert_eq!(format_usd(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_usd(dec("123")), "$123.00");
    }

    #[test]
    fn test_format_usd_rounds_half_away_from_zero() {
        assert_eq!(format_usd(dec("0.125")), "$0.13");
        assert_eq!(format_usd(dec("-12.345")), "-$12.35");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0.00100000"), Some(dec("0.001")));
        assert_eq!(parse_decimal("1e-3"), Some(dec("0.001")));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_decimal_repr_accepts_string_and_number() {
        let text: DecimalRepr = serde_json::from_str("\"50000.5\"").unwrap();
        let number: DecimalRepr = serde_json::from_str("50000.5").unwrap();
        assert_eq!(text.to_decimal(), Some(dec("50000.5")));
        assert_eq!(number.to_decimal(), Some(dec("50000.5")));
        assert_eq!(text.into_text(), "50000.5");
        assert_eq!(number.into_text(), "50000.5");
    }

    #[test]
    fn test_decimal_repr_keeps_unparsable_values() {
        let null: DecimalRepr = serde_json::from_str("null").unwrap();
        let empty: DecimalRepr = serde_json::from_str("\"\"").unwrap();
        assert_eq!(null, DecimalRepr::Other(serde_json::Value::Null));
        assert_eq!(null.to_decimal(), None);
        assert_eq!(empty.to_decimal(), None);
    }
}
