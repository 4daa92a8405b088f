// ============================================================================
// Enum : Symbol
// ============================================================================
// Les deux cryptomonnaies affichées par le dashboard
//
// CONCEPT RUST : Enum Copy
// - Pas de données, 1 octet, copié implicitement
// - Le symbole d'un PriceFeed est constant : changer de symbole = nouveau feed
// ============================================================================

use std::fmt;

/// Cryptomonnaie supportée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    /// Bitcoin (page d'accueil)
    #[default]
    Btc,
    /// Litecoin
    Ltc,
}

impl Symbol {
    /// Ordre des pages dans la barre de navigation
    pub const ALL: [Symbol; 2] = [Symbol::Btc, Symbol::Ltc];

    /// Code utilisé dans les URLs chain.so (minuscules)
    pub fn api_code(&self) -> &'static str {
        match self {
            Symbol::Btc => "btc",
            Symbol::Ltc => "ltc",
        }
    }

    /// Ticker pour l'affichage (ex: "BTC")
    pub fn ticker(&self) -> &'static str {
        match self {
            Symbol::Btc => "BTC",
            Symbol::Ltc => "LTC",
        }
    }

    /// Nom complet de la page
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Btc => "Bitcoin",
            Symbol::Ltc => "Litecoin",
        }
    }

    /// Symbole suivant (navigation cyclique avec Tab)
    pub fn next(&self) -> Symbol {
        match self {
            Symbol::Btc => Symbol::Ltc,
            Symbol::Ltc => Symbol::Btc,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}
