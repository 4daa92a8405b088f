// ============================================================================
// RequestToken
// ============================================================================
// Chaque requête reçoit un jeton strictement croissant. Un PriceFeed ou un
// WalletLookup ne retient que le dernier jeton émis : toute réponse portant
// un autre jeton est périmée et ignorée.
//
// CONCEPT RUST : AtomicU64 statique
// - Compteur global, unique pour tout le processus
// - Un feed recréé (changement de page) ne peut jamais recevoir par erreur
//   la réponse d'un ancien feed du même symbole
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifiant d'une requête
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Émet un nouveau jeton, plus grand que tous les précédents
    pub fn next() -> Self {
        RequestToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
