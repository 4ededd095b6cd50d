// ============================================================================
// Gestion des événements
// ============================================================================
// Lecture des événements clavier avec timeout
//
// CONCEPTS RUST :
// 1. Enums avec variants : Key(KeyEvent) ou Tick
// 2. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Aucun événement pendant le timeout (permet de redessiner)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    timeout: Duration,
}

impl EventHandler {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// Si pas d'événement avant le timeout, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.timeout)? {
            return Ok(Event::Tick);
        }

        match event::read()? {
            // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
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
// Helpers : Convertir KeyEvent en action
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

/// 'q' : quitter
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// 'r' : rafraîchissement manuel
pub fn is_refresh_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('r') | KeyCode::Char('R')))
}

/// Tab : onglet suivant
pub fn is_tab_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Tab | KeyCode::BackTab))
}

/// 'i', '/' ou Entrée : éditer la saisie de l'onglet actif
pub fn is_edit_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter)
    )
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Up | KeyCode::Char('k')))
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Down | KeyCode::Char('j')))
}

/// Caractère acceptable dans un symbole : alphanumérique, '-', '.', '^', '='
pub fn ticker_char(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) if c.is_alphanumeric() || matches!(c, '-' | '.' | '^' | '=') => {
            Some(c)
        }
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
    fn test_ticker_char() {
        assert_eq!(ticker_char(&key(KeyCode::Char('a'))), Some('a'));
        assert_eq!(ticker_char(&key(KeyCode::Char('-'))), Some('-'));
        assert_eq!(ticker_char(&key(KeyCode::Char('^'))), Some('^'));
        assert_eq!(ticker_char(&key(KeyCode::Char(' '))), None);
        assert_eq!(ticker_char(&key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_edit_and_tab_events() {
        assert!(is_edit_event(&key(KeyCode::Char('i'))));
        assert!(is_edit_event(&key(KeyCode::Enter)));
        assert!(is_tab_event(&key(KeyCode::Tab)));
        assert!(!is_tab_event(&Event::Tick));
    }
}
