// ============================================================================
// Structure : ExchangeQuote
// ============================================================================
// Une cotation USD publiée par un exchange pour un symbole.
// L'API renvoie une liste de cotations ; seule celle de l'exchange de
// référence (bitfinex) est affichée, et seul son prix est parsé : une
// cotation illisible d'un autre exchange ne compte pas.
// ============================================================================

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::FetchError;
use crate::models::money::DecimalRepr;
use crate::models::Symbol;

/// Exchange dont la cotation fait foi
pub const REFERENCE_EXCHANGE: &str = "bitfinex";

/// Cotation d'un exchange, prix encore brut
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeQuote {
    pub exchange: String,

    #[serde(default)]
    price: DecimalRepr,
}

impl ExchangeQuote {
    /// Prix parsé ; MalformedResponse s'il n'est pas un nombre
    pub fn price(&self) -> Result<Decimal, FetchError> {
        self.price.to_decimal().ok_or_else(|| {
            FetchError::MalformedResponse(format!(
                "prix invalide pour {} : {:?}",
                self.exchange, self.price
            ))
        })
    }
}

/// Sélectionne la cotation de `exchange` ("find-or-fail")
///
/// CONCEPT RUST : Option -> Result avec ok_or_else
/// - .find() retourne Option<&ExchangeQuote>
/// - L'absence devient une erreur nommée, jamais un accès indexé non vérifié
pub fn select_quote<'a>(
    quotes: &'a [ExchangeQuote],
    exchange: &str,
    symbol: Symbol,
) -> Result<&'a ExchangeQuote, FetchError> {
    quotes
        .iter()
        .find(|quote| quote.exchange == exchange)
        .ok_or_else(|| FetchError::QuoteNotFound {
            exchange: exchange.to_string(),
            symbol: symbol.api_code().to_string(),
        })
}
