// ============================================================================
// Module : state
// ============================================================================
// Le coeur du dashboard : machines à états alimentées par les réponses de
// l'API. Aucune I/O ici : les requêtes sont émises par le worker, les
// résultats reviennent avec leur RequestToken et sont appliqués (ou ignorés
// s'ils sont périmés).
// ============================================================================

pub mod price_feed;        // Prix USD d'un symbole (Loading / Ready / Error)
pub mod request_token;     // Jetons monotones pour "last-request-wins"
pub mod transaction_table; // Tri + pagination des transactions
pub mod wallet_lookup;     // Recherche d'adresse (Idle / Loading / Found / ...)

pub use price_feed::{PriceFeed, PriceStatus};
pub use request_token::RequestToken;
pub use transaction_table::{SortKey, SortOrder, TablePage, TransactionTable};
pub use wallet_lookup::{WalletLookup, WalletStatus};
