// ============================================================================
// Module : error
// ============================================================================
// Taxonomie des erreurs de récupération (prix et transactions)
//
// CONCEPTS RUST :
// 1. thiserror : dérive Display + std::error::Error sur un enum
// 2. From : conversion automatique des erreurs reqwest / serde_json avec ?
// 3. Clone + PartialEq : l'erreur est stockée dans l'état affiché (PriceStatus)
// ============================================================================

use thiserror::Error;

/// Erreur lors d'un appel à l'API de l'explorateur
///
/// Toutes ces erreurs sont absorbées par les machines à états
/// (PriceFeed, WalletLookup) : aucune ne remonte jusqu'à l'UI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Erreur de transport (DNS, timeout, connexion refusée, HTTP non-2xx)
    #[error("erreur réseau : {0}")]
    Network(String),

    /// JSON inattendu (champ manquant, type incorrect, date invalide)
    #[error("réponse malformée : {0}")]
    MalformedResponse(String),

    /// La cotation de l'exchange de référence est absente
    #[error("cotation {exchange} introuvable pour {symbol}")]
    QuoteNotFound { exchange: String, symbol: String },
}

/// Classification sans données, pratique pour les tests et les logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    MalformedResponse,
    QuoteNotFound,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::MalformedResponse(_) => FetchErrorKind::MalformedResponse,
            FetchError::QuoteNotFound { .. } => FetchErrorKind::QuoteNotFound,
        }
    }

    /// Message court affiché à l'utilisateur
    ///
    /// Network et MalformedResponse s'affichent de la même façon,
    /// seuls les logs les distinguent.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) | FetchError::MalformedResponse(_) => {
                "Falha ao carregar".to_string()
            }
            FetchError::QuoteNotFound { exchange, .. } => {
                format!("Falha ao carregar: cotação {} indisponível", exchange)
            }
        }
    }
}

// CONCEPT RUST : From pour l'opérateur ?
// - Une erreur de décodage du corps est une réponse malformée
// - Tout le reste (connexion, timeout, statut) est du transport
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(FetchError::Network("x".into()).kind(), FetchErrorKind::Network);
        let err = FetchError::QuoteNotFound {
            exchange: "bitfinex".into(),
            symbol: "btc".into(),
        };
        assert_eq!(err.kind(), FetchErrorKind::QuoteNotFound);
    }

    #[test]
    fn test_serde_error_is_malformed() {
        let err: FetchError = serde_json::from_str::<u32>("\"nope\"").unwrap_err().into();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let network = FetchError::Network("connection refused".into());
        let malformed = FetchError::MalformedResponse("missing field".into());
        assert_eq!(network.user_message(), malformed.user_message());
        assert_eq!(network.user_message(), "Falha ao carregar");
    }
}
