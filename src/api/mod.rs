// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'explorateur de blocs (chain.so) et le
// trait ExplorerApi qui sépare le coeur (state/) du transport HTTP.
// ============================================================================

pub mod chain_so; // Client API chain.so

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::FetchError;
use crate::models::{Symbol, Transaction};

// Re-export des éléments principaux
pub use chain_so::{parse_price_response, parse_tx_received_response, ChainSoClient};

/// Résultat d'une recherche de transactions reçues
///
/// NotFound n'est PAS une erreur : l'échange HTTP a réussi mais
/// l'explorateur ne reconnaît pas l'adresse (status == "fail").
#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedTransactions {
    /// Adresse connue, transactions dans l'ordre renvoyé par l'API
    Found {
        address: String,
        transactions: Vec<Transaction>,
    },

    /// Adresse inconnue de l'explorateur
    NotFound,
}

/// Source de données de l'explorateur
///
/// CONCEPT RUST : #[async_trait]
/// - Les méthodes async dans un trait objet (dyn ExplorerApi)
/// - Send + Sync : partagé entre les tâches tokio du worker via Arc
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// Prix USD de l'exchange de référence pour `symbol`
    async fn fetch_price(&self, symbol: Symbol) -> Result<Decimal, FetchError>;

    /// Transactions reçues par `address`
    async fn fetch_received(&self, address: &str) -> Result<ReceivedTransactions, FetchError>;
}
