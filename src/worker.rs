// ============================================================================
// Background Worker
// ============================================================================
// Thread séparé qui exécute les requêtes HTTP sans bloquer l'UI
//
// CONCEPTS RUST :
// 1. Command pattern avec channels : l'event loop envoie des Command,
//    le worker renvoie des Outcome (std::sync::mpsc)
// 2. Runtime tokio par thread : le thread UI reste synchrone
// 3. runtime.spawn() : chaque commande est une tâche indépendante, les
//    réponses peuvent donc arriver dans le désordre. Le RequestToken porté
//    par chaque Outcome permet au coeur d'ignorer les réponses périmées.
// ============================================================================

use std::sync::{mpsc, Arc};
use std::thread;

use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::api::{ExplorerApi, ReceivedTransactions};
use crate::error::FetchError;
use crate::models::Symbol;
use crate::state::RequestToken;

/// Commandes envoyées au worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Récupérer le prix d'un symbole
    FetchPrice { symbol: Symbol, token: RequestToken },

    /// Récupérer les transactions reçues par une adresse
    LookupWallet { address: String, token: RequestToken },
}

impl Command {
    pub fn token(&self) -> RequestToken {
        match self {
            Command::FetchPrice { token, .. } | Command::LookupWallet { token, .. } => *token,
        }
    }
}

/// Résultats renvoyés par le worker, étiquetés par leur jeton
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Price {
        symbol: Symbol,
        token: RequestToken,
        result: Result<Decimal, FetchError>,
    },

    Wallet {
        token: RequestToken,
        result: Result<ReceivedTransactions, FetchError>,
    },
}

impl Outcome {
    /// Outcome d'échec pour une commande qui n'a pas pu être exécutée
    pub fn failed(command: Command, error: FetchError) -> Self {
        match command {
            Command::FetchPrice { symbol, token } => Outcome::Price {
                symbol,
                token,
                result: Err(error),
            },
            Command::LookupWallet { token, .. } => Outcome::Wallet {
                token,
                result: Err(error),
            },
        }
    }
}

/// Exécute une commande (utilisé par le worker, testable seul)
pub async fn execute(api: &dyn ExplorerApi, command: Command) -> Outcome {
    match command {
        Command::FetchPrice { symbol, token } => Outcome::Price {
            symbol,
            token,
            result: api.fetch_price(symbol).await,
        },
        Command::LookupWallet { address, token } => Outcome::Wallet {
            token,
            result: api.fetch_received(&address).await,
        },
    }
}

/// Lance le worker thread
///
/// Le thread s'arrête quand tous les `Sender<Command>` sont fermés ; les
/// requêtes encore en vol sont alors abandonnées avec le runtime.
///
/// # Arguments
/// * `api` - Source de données (ChainSoClient en production)
/// * `command_rx` - Receiver des commandes
/// * `outcome_tx` - Sender des résultats
pub fn spawn_worker(
    api: Arc<dyn ExplorerApi>,
    command_rx: mpsc::Receiver<Command>,
    outcome_tx: mpsc::Sender<Outcome>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker not started");
                return;
            }
        };

        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");
            let api = Arc::clone(&api);
            let outcome_tx = outcome_tx.clone();

            runtime.spawn(async move {
                let outcome = execute(api.as_ref(), command).await;
                if outcome_tx.send(outcome).is_err() {
                    debug!("Outcome receiver dropped");
                }
            });
        }

        info!("Worker thread exiting (channel closed)");
    })
}

// ============================================================================
// Tests
// ============================================================================
