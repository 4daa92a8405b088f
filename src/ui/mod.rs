// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// Ne lit que l'état produit par App : aucune logique de récupération ici
// ============================================================================

pub mod dashboard; // Rendu de l'interface principale
pub mod events;    // Gestion des événements clavier / focus

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
