// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier, le focus du terminal et les ticks
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : matches! pour tester une touche en une ligne
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

use crate::models::Symbol;

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Le terminal a retrouvé le focus (revalidation du prix)
    FocusGained,

    /// Tick régulier (revalidation périodique, rendu)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire ; `tick_rate` borne l'attente d'un événement
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }

        match event::read()? {
            // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
            CrosstermEvent::FocusGained => Ok(Event::FocusGained),
            // Release, resize, souris, perte de focus : ignorés
            _ => Ok(Event::Tick),
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

// ============================================================================
// Helpers : Convertir un événement en action
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        _ => None,
    }
}

/// 'q' (quitter, avec confirmation)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// 'r' : rafraîchir le prix maintenant
pub fn is_refresh_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('r') | KeyCode::Char('R')))
}

/// 'm' : ouvrir / fermer la barre latérale
pub fn is_sidebar_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('m') | KeyCode::Char('M')))
}

/// 'a' ou '/' : saisir une adresse
pub fn is_address_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('/'))
    )
}

/// Tab : page suivante
pub fn is_tab_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Tab))
}

/// '1' / '2' : accès direct à une page
pub fn page_shortcut(event: &Event) -> Option<Symbol> {
    match key_code(event)? {
        KeyCode::Char('1') => Some(Symbol::Btc),
        KeyCode::Char('2') => Some(Symbol::Ltc),
        _ => None,
    }
}

/// 's' : colonne de tri suivante
pub fn is_sort_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('s') | KeyCode::Char('S')))
}

/// 'o' : inverser le sens du tri
pub fn is_order_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('o') | KeyCode::Char('O')))
}

/// → ou 'l' (vim) : page suivante du tableau
pub fn is_next_page_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Right | KeyCode::Char('l')))
}

/// ← ou 'h' (vim) : page précédente du tableau
pub fn is_previous_page_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Left | KeyCode::Char('h')))
}

/// Caractère acceptable dans une adresse (base58 / bech32 : alphanumérique)
pub fn is_address_char_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char(c)) if c.is_ascii_alphanumeric())
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event)? {
        KeyCode::Char(c) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_page_shortcut() {
        assert_eq!(page_shortcut(&key(KeyCode::Char('1'))), Some(Symbol::Btc));
        assert_eq!(page_shortcut(&key(KeyCode::Char('2'))), Some(Symbol::Ltc));
        assert_eq!(page_shortcut(&key(KeyCode::Char('3'))), None);
        assert_eq!(page_shortcut(&Event::FocusGained), None);
    }

    #[test]
    fn test_address_chars() {
        assert!(is_address_char_event(&key(KeyCode::Char('1'))));
        assert!(is_address_char_event(&key(KeyCode::Char('Z'))));
        assert!(!is_address_char_event(&key(KeyCode::Char(' '))));
        assert!(!is_address_char_event(&key(KeyCode::Enter)));
        assert_eq!(get_char_from_event(&key(KeyCode::Char('b'))), Some('b'));
    }
}
