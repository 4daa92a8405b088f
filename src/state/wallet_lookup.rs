// ============================================================================
// Structure : WalletLookup
// ============================================================================
// Recherche des transactions reçues par une adresse
//
// State machine :
//   Idle -> Loading -> { Found | NotFound | Error }
//   état terminal --submit--> Loading (les anciens résultats sont jetés)
//
// Idle n'existe qu'à la création. Un submit vide ne change rien.
// ============================================================================

use tracing::{debug, info, warn};

use crate::api::ReceivedTransactions;
use crate::error::FetchError;
use crate::models::Transaction;
use crate::state::price_feed::LOADING_TEXT;
use crate::state::RequestToken;

/// Message quand l'explorateur ne connaît pas l'adresse
pub const NOT_FOUND_TEXT: &str = "Endereço não encontrado";

/// Message quand l'adresse existe mais n'a reçu aucune transaction
pub const NO_ROWS_TEXT: &str = "Nenhuma transação";

/// État observable de la recherche
#[derive(Debug, Clone, PartialEq)]
pub enum WalletStatus {
    /// Aucune recherche encore lancée
    Idle,

    /// Recherche en cours pour `address`
    Loading { address: String },

    /// Adresse connue ; transactions dans l'ordre de l'API (éventuellement vide)
    Found {
        address: String,
        transactions: Vec<Transaction>,
    },

    /// Adresse inconnue de l'explorateur (status == "fail")
    NotFound { address: String },

    /// Erreur de transport ou réponse malformée
    Error { address: String, error: FetchError },
}

/// Recherche d'adresse avec discipline "last-submit-wins"
#[derive(Debug)]
pub struct WalletLookup {
    status: WalletStatus,
    latest: Option<RequestToken>,
}

impl WalletLookup {
    pub fn new() -> Self {
        Self {
            status: WalletStatus::Idle,
            latest: None,
        }
    }

    pub fn status(&self) -> &WalletStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, WalletStatus::Loading { .. })
    }

    /// Adresse de la recherche courante (None en Idle)
    pub fn address(&self) -> Option<&str> {
        match &self.status {
            WalletStatus::Idle => None,
            WalletStatus::Loading { address }
            | WalletStatus::Found { address, .. }
            | WalletStatus::NotFound { address }
            | WalletStatus::Error { address, .. } => Some(address),
        }
    }

    /// Transactions, seulement en Found
    pub fn transactions(&self) -> Option<&[Transaction]> {
        match &self.status {
            WalletStatus::Found { transactions, .. } => Some(transactions),
            _ => None,
        }
    }

    /// Lance une recherche
    ///
    /// L'adresse est nettoyée (trim). Vide : aucun changement, retourne None.
    /// Sinon passe en Loading AVANT toute I/O et retourne le jeton et
    /// l'adresse à transmettre au worker.
    pub fn submit(&mut self, address: &str) -> Option<(RequestToken, String)> {
        let address = address.trim();
        if address.is_empty() {
            debug!("Empty address, ignoring submit");
            return None;
        }

        let token = RequestToken::next();
        if self.is_loading() {
            debug!(%token, "Superseding in-flight wallet lookup");
        }
        info!(address = %address, %token, "Wallet lookup submitted");

        self.latest = Some(token);
        self.status = WalletStatus::Loading {
            address: address.to_string(),
        };
        Some((token, address.to_string()))
    }

    /// Applique une réponse ; ignore (false) les jetons périmés
    pub fn apply(
        &mut self,
        token: RequestToken,
        result: Result<ReceivedTransactions, FetchError>,
    ) -> bool {
        if self.latest != Some(token) {
            debug!(%token, "Ignoring stale wallet response");
            return false;
        }

        let submitted = self.address().unwrap_or_default().to_string();
        self.status = match result {
            Ok(ReceivedTransactions::Found {
                address,
                transactions,
            }) => {
                info!(address = %address, count = transactions.len(), "Wallet lookup found");
                WalletStatus::Found {
                    address,
                    transactions,
                }
            }
            Ok(ReceivedTransactions::NotFound) => {
                info!(address = %submitted, "Wallet address not found");
                WalletStatus::NotFound { address: submitted }
            }
            Err(error) => {
                warn!(address = %submitted, kind = ?error.kind(), error = %error, "Wallet lookup failed");
                WalletStatus::Error {
                    address: submitted,
                    error,
                }
            }
        };
        true
    }

    /// Message à afficher à la place du tableau, s'il y en a un
    ///
    /// Found avec des lignes -> None (le tableau s'affiche).
    /// Found sans ligne -> "Nenhuma transação", distinct de NotFound.
    pub fn status_message(&self) -> Option<String> {
        match &self.status {
            WalletStatus::Idle => None,
            WalletStatus::Loading { .. } => Some(LOADING_TEXT.to_string()),
            WalletStatus::Found { transactions, .. } if transactions.is_empty() => {
                Some(NO_ROWS_TEXT.to_string())
            }
            WalletStatus::Found { .. } => None,
            WalletStatus::NotFound { .. } => Some(NOT_FOUND_TEXT.to_string()),
            WalletStatus::Error { error, .. } => Some(error.user_message()),
        }
    }
}

impl Default for WalletLookup {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
