// ============================================================================
// RBravo - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client chain.so + trait ExplorerApi
pub mod app;       // État de l'application
pub mod config;    // Configuration TOML
pub mod error;     // FetchError
pub mod models;    // Structures de données
pub mod state;     // PriceFeed, WalletLookup, TransactionTable
pub mod ui;        // Interface utilisateur
pub mod worker;    // Thread des requêtes HTTP
