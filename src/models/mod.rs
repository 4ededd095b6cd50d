// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module public
// - Les re-exports permettent : use quoteterm::models::Ticker;
// ============================================================================

pub mod quote;           // QuoteSnapshot, PriceFields, Trend
pub mod ticker;          // Ticker normalisé
pub mod watchlist_entry; // Ligne de watchlist et sa mise à jour d'affichage

pub use quote::{PriceFields, QuoteSnapshot, Trend};
pub use ticker::Ticker;
pub use watchlist_entry::{WatchlistEntry, WatchlistRow};
