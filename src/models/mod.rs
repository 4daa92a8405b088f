// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod money;       // Parsing et formatage des montants (Decimal)
pub mod quote;       // Cotations par exchange + sélection de la référence
pub mod symbol;      // BTC / LTC
pub mod transaction; // Transaction reçue par une adresse

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use rbravo::models::symbol::Symbol;
// On peut faire : use rbravo::models::Symbol;
pub use money::{format_usd, parse_decimal};
pub use quote::{select_quote, ExchangeQuote, REFERENCE_EXCHANGE};
pub use symbol::Symbol;
pub use transaction::Transaction;
