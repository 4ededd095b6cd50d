// ============================================================================
// Structure : App
// ============================================================================
// État de l'interface TUI (thread UI uniquement)
//
// App ne contient AUCUNE logique métier : elle garde ce que le worker lui
// a envoyé (vue Quote, lignes de watchlist) et l'état de saisie.
//
// PATTERN : "Application State"
// - Le rendu lit depuis App
// - Les événements clavier modifient App ou produisent une Command
// ============================================================================

use chrono::{DateTime, Local};

use crate::models::WatchlistRow;
use crate::quote_display::QuoteView;
use crate::sink::DisplayUpdate;
use crate::worker::Command;

// ============================================================================
// Enums : Tab et Mode
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul onglet actif à la fois
// - Mode Input : les touches vont dans le buffer de l'onglet actif
// ============================================================================

/// Onglets de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Cotation d'un seul ticker
    Quote,

    /// Table de la watchlist
    Watchlist,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Quote => "Quote",
            Tab::Watchlist => "Watchlist",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Quote => 0,
            Tab::Watchlist => 1,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Quote => Tab::Watchlist,
            Tab::Watchlist => Tab::Quote,
        }
    }
}

/// Mode de saisie (Vim-like)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Input,
}

/// État principal de l'interface
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Onglet affiché
    pub current_tab: Tab,

    /// Normal ou saisie
    pub mode: Mode,

    /// Saisie de l'onglet Quote (conservée après validation)
    pub quote_input: String,

    /// Saisie de l'onglet Watchlist (vidée après validation)
    pub watchlist_input: String,

    /// Dernière vue Quote reçue du worker
    pub quote: Option<QuoteView>,

    /// Lignes de la watchlist, dans l'ordre d'ajout
    pub rows: Vec<WatchlistRow>,

    /// Index de la ligne sélectionnée dans la watchlist
    pub selected_index: usize,

    /// Heure de fin du dernier cycle de rafraîchissement
    pub last_refresh: Option<DateTime<Local>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            current_tab: Tab::Quote,
            mode: Mode::Normal,
            quote_input: String::new(),
            watchlist_input: String::new(),
            quote: None,
            rows: Vec::new(),
            selected_index: 0,
            last_refresh: None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn next_tab(&mut self) {
        self.current_tab = self.current_tab.next();
    }

    // ========================================================================
    // Mises à jour venant du worker
    // ========================================================================

    /// Applique une mise à jour reçue du DisplaySink
    ///
    /// Une ligne existante est remplacée, une nouvelle est ajoutée en fin.
    pub fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::Quote(view) => self.quote = Some(view),
            DisplayUpdate::Row(row) => {
                match self.rows.iter_mut().find(|r| r.ticker == row.ticker) {
                    Some(existing) => *existing = row,
                    None => self.rows.push(row),
                }
            }
            DisplayUpdate::Refreshed => self.last_refresh = Some(Local::now()),
        }
    }

    // ========================================================================
    // Navigation dans la watchlist
    // ========================================================================

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.rows.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    pub fn start_input(&mut self) {
        self.mode = Mode::Input;
    }

    pub fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.mode == Mode::Input
    }

    /// Buffer de saisie de l'onglet actif
    pub fn input(&self) -> &str {
        match self.current_tab {
            Tab::Quote => &self.quote_input,
            Tab::Watchlist => &self.watchlist_input,
        }
    }

    fn input_mut(&mut self) -> &mut String {
        match self.current_tab {
            Tab::Quote => &mut self.quote_input,
            Tab::Watchlist => &mut self.watchlist_input,
        }
    }

    pub fn append_char(&mut self, c: char) {
        self.input_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.input_mut().pop();
    }

    /// Valide la saisie et retourne la commande à envoyer au worker
    ///
    /// Saisie vide : aucune commande, on reste en mode input.
    pub fn submit_input(&mut self) -> Option<Command> {
        let value = self.input().trim().to_uppercase();
        if value.is_empty() {
            return None;
        }

        self.mode = Mode::Normal;
        match self.current_tab {
            Tab::Quote => Some(Command::Query(value)),
            Tab::Watchlist => {
                self.watchlist_input.clear();
                Some(Command::Add(value))
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
