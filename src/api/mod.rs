// ============================================================================
// Module : api
// ============================================================================
// Fournisseurs de cotations. Le coeur de l'application ne connaît que le
// trait QuoteProvider ; Yahoo Finance en est l'implémentation réelle.
// ============================================================================

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{QuoteSnapshot, Ticker};

pub mod yahoo; // Client API Yahoo Finance

#[cfg(test)]
pub(crate) mod scripted; // Fournisseur en mémoire pour les tests

pub use yahoo::YahooProvider;

/// Capacité "donne-moi les prix de ce symbole"
///
/// CONCEPT RUST : async_trait
/// - Permet d'utiliser le trait derrière Arc<dyn QuoteProvider>
/// - Send + Sync : partageable avec le thread worker
///
/// Un champ absent dans le snapshot et une erreur sont traités de la même
/// façon par les appelants : échec non fatal pour ce ticker.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<QuoteSnapshot, FetchError>;
}
