// ============================================================================
// Structure : QuoteDisplayState
// ============================================================================
// État de la vue "Quote" : le ticker interrogé et le dernier prix affiché
//
// Deux signaux de couleur indépendants sont calculés à chaque fetch :
// - movement     : nouveau prix comparé au dernier prix affiché du MÊME ticker
// - change_trend : signe de la variation journalière
//
// Le dernier prix affiché est gardé avec le ticker qui l'a produit : un
// échec (sur n'importe quel ticker) ne l'efface pas. Il n'est jamais persisté.
// ============================================================================

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::QuoteProvider;
use crate::models::{Ticker, Trend};

/// Ce que la vue Quote doit afficher après un fetch
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteView {
    /// Cotation complète avec ses deux couleurs
    Quote {
        ticker: Ticker,
        price: f64,
        change: f64,
        change_pct: f64,
        previous_close: f64,
        movement: Trend,
        change_trend: Trend,
    },

    /// Le fournisseur a répondu sans prix exploitable
    Unavailable { ticker: Ticker },

    /// Le fournisseur a échoué
    Error { ticker: Ticker, message: String },
}

impl QuoteView {
    pub fn ticker(&self) -> &Ticker {
        match self {
            QuoteView::Quote { ticker, .. }
            | QuoteView::Unavailable { ticker }
            | QuoteView::Error { ticker, .. } => ticker,
        }
    }

    /// Vrai pour les deux cas d'échec (message inline dans la vue)
    pub fn is_failure(&self) -> bool {
        !matches!(self, QuoteView::Quote { .. })
    }
}

/// Ticker courant de la vue Quote et son dernier prix affiché
pub struct QuoteDisplayState {
    current_ticker: Option<Ticker>,
    /// Dernier fetch réussi : (ticker, prix)
    last_displayed: Option<(Ticker, f64)>,
    provider: Arc<dyn QuoteProvider>,
}

impl QuoteDisplayState {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            current_ticker: None,
            last_displayed: None,
            provider,
        }
    }

    pub fn current_ticker(&self) -> Option<&Ticker> {
        self.current_ticker.as_ref()
    }

    /// Prix du dernier fetch réussi, quel que soit son ticker
    pub fn last_displayed_price(&self) -> Option<f64> {
        self.last_displayed.as_ref().map(|(_, price)| *price)
    }

    /// Dernier prix affiché, seulement s'il vient de `ticker`
    fn last_price_of(&self, ticker: &Ticker) -> Option<f64> {
        match &self.last_displayed {
            Some((last, price)) if last == ticker => Some(*price),
            _ => None,
        }
    }

    /// Interroge le fournisseur pour `ticker` et calcule la vue
    ///
    /// Le ticker devient le ticker courant même si le fetch échoue : le
    /// prochain refresh le réessaiera. En cas d'échec, le dernier prix
    /// affiché n'est pas touché.
    pub async fn update(&mut self, ticker: Ticker) -> QuoteView {
        self.current_ticker = Some(ticker.clone());

        let snapshot = match self.provider.fetch_quote(&ticker).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Quote fetch failed");
                return QuoteView::Error {
                    ticker,
                    message: e.to_string(),
                };
            }
        };

        let Some(fields) = snapshot.fields() else {
            debug!(ticker = %ticker, ?snapshot, "Quote has no usable price");
            return QuoteView::Unavailable { ticker };
        };

        // Pas de comparaison entre deux tickers différents
        let movement = Trend::movement(fields.price, self.last_price_of(&ticker));
        let change_trend = Trend::of_change(fields.change_pct);
        self.last_displayed = Some((ticker.clone(), fields.price));

        QuoteView::Quote {
            ticker,
            price: fields.price,
            change: fields.change,
            change_pct: fields.change_pct,
            previous_close: fields.previous_close,
            movement,
            change_trend,
        }
    }

    /// Relance update() sur le ticker courant ; rien si aucun ticker
    pub async fn refresh_current(&mut self) -> Option<QuoteView> {
        let ticker = self.current_ticker.clone()?;
        Some(self.update(ticker).await)
    }
}

// ============================================================================
// Tests
// ============================================================================
