// ============================================================================
// Structure : PriceFeed
// ============================================================================
// Prix USD d'un symbole, revalidé périodiquement
//
// CONCEPTS :
// 1. State machine : Loading -> Ready | Error, puis remplacement complet à
//    chaque réponse (pas de prix périmé conservé après une erreur)
// 2. Last-request-wins : seule la réponse du dernier jeton émis est appliquée
// 3. Coalescence : pas de revalidation automatique tant qu'une requête est
//    en cours ; un rafraîchissement manuel, lui, remplace la requête en cours
// ============================================================================

use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::{format_usd, Symbol};
use crate::state::RequestToken;

/// Texte affiché pendant le premier chargement
pub const LOADING_TEXT: &str = "Carregando...";

/// État observable du prix
///
/// CONCEPT RUST : Enum avec données
/// - Le prix n'existe que dans Ready : impossible de lire une valeur
///   pendant Loading ou Error
#[derive(Debug, Clone, PartialEq)]
pub enum PriceStatus {
    /// Aucune réponse encore appliquée
    Loading,

    /// Dernière réponse : erreur
    Error(FetchError),

    /// Dernière réponse : prix de l'exchange de référence
    Ready(Decimal),
}

/// Prix d'un symbole avec revalidation
#[derive(Debug)]
pub struct PriceFeed {
    symbol: Symbol,
    status: PriceStatus,
    refresh_interval: Duration,

    /// Dernier jeton émis ; seules ses réponses sont appliquées
    latest: Option<RequestToken>,

    /// true entre l'émission de `latest` et l'application de sa réponse
    in_flight: bool,

    /// Instant de la dernière requête émise
    last_started: Option<Instant>,
}

impl PriceFeed {
    /// Crée un feed en état Loading ; aucune requête n'est émise ici
    pub fn new(symbol: Symbol, refresh_interval: Duration) -> Self {
        Self {
            symbol,
            status: PriceStatus::Loading,
            refresh_interval,
            latest: None,
            in_flight: false,
            last_started: None,
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn status(&self) -> &PriceStatus {
        &self.status
    }

    /// Une requête est en cours alors qu'un résultat est déjà affiché
    pub fn is_revalidating(&self) -> bool {
        self.in_flight && self.status != PriceStatus::Loading
    }

    /// Émet une nouvelle requête ; remplace toute requête en cours
    pub fn start_refresh(&mut self, now: Instant) -> RequestToken {
        let token = RequestToken::next();
        if self.in_flight {
            debug!(symbol = %self.symbol, %token, "Superseding in-flight price request");
        }
        self.latest = Some(token);
        self.in_flight = true;
        self.last_started = Some(now);
        token
    }

    /// Politique de revalidation automatique
    ///
    /// Retourne un jeton si aucune requête n'a jamais été émise, ou si
    /// aucune n'est en cours et que l'intervalle est écoulé.
    pub fn poll_due(&mut self, now: Instant) -> Option<RequestToken> {
        if self.in_flight {
            return None;
        }
        let due = match self.last_started {
            None => true,
            Some(started) => now.saturating_duration_since(started) >= self.refresh_interval,
        };
        due.then(|| self.start_refresh(now))
    }

    /// Revalidation sur retour du focus : coalescée avec la requête en cours
    pub fn revalidate(&mut self, now: Instant) -> Option<RequestToken> {
        if self.in_flight {
            None
        } else {
            Some(self.start_refresh(now))
        }
    }

    /// Applique une réponse
    ///
    /// Retourne false (et ne change rien) si le jeton est périmé.
    /// Sinon l'état est remplacé en entier : une erreur efface le prix.
    pub fn apply(&mut self, token: RequestToken, result: Result<Decimal, FetchError>) -> bool {
        if self.latest != Some(token) {
            debug!(symbol = %self.symbol, %token, "Ignoring stale price response");
            return false;
        }

        self.in_flight = false;
        self.status = match result {
            Ok(price) => {
                info!(symbol = %self.symbol, price = %price, "Price updated");
                PriceStatus::Ready(price)
            }
            Err(error) => {
                warn!(symbol = %self.symbol, kind = ?error.kind(), error = %error, "Price fetch failed");
                PriceStatus::Error(error)
            }
        };
        true
    }

    /// Texte principal : "Carregando...", "$50,000.50" ou message d'erreur
    pub fn display(&self) -> String {
        match &self.status {
            PriceStatus::Loading => LOADING_TEXT.to_string(),
            PriceStatus::Ready(price) => format_usd(*price),
            PriceStatus::Error(error) => error.user_message(),
        }
    }

    /// Détail technique de l'erreur (pour la barre d'état)
    pub fn error_detail(&self) -> Option<String> {
        match &self.status {
            PriceStatus::Error(error) => Some(error.to_string()),
            _ => None,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
