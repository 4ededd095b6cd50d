// ============================================================================
// Module : sink
// ============================================================================
// Capacité d'affichage : le coeur pousse des mises à jour, sans savoir
// comment elles sont dessinées.
//
// CONCEPT RUST : Trait objects
// - &mut dyn DisplaySink : le scheduler accepte n'importe quelle sortie
// - ChannelSink envoie au thread UI, Vec<DisplayUpdate> sert aux tests
// ============================================================================

use std::sync::mpsc;

use tracing::warn;

use crate::models::WatchlistRow;
use crate::quote_display::QuoteView;

/// Mise à jour transmise à la couche d'affichage
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
    /// Nouveau contenu de la vue Quote
    Quote(QuoteView),

    /// Ligne de la watchlist ajoutée ou rafraîchie
    Row(WatchlistRow),

    /// Fin d'un cycle de rafraîchissement (horodatage côté UI)
    Refreshed,
}

/// Sortie des mises à jour calculées par le coeur
pub trait DisplaySink {
    fn show_quote(&mut self, view: QuoteView);

    fn update_row(&mut self, row: WatchlistRow);

    /// Signale la fin d'un cycle ; optionnel
    fn refreshed(&mut self) {}
}

/// Envoie les mises à jour au thread UI via un channel
pub struct ChannelSink {
    tx: mpsc::Sender<DisplayUpdate>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<DisplayUpdate>) -> Self {
        Self { tx }
    }

    fn send(&self, update: DisplayUpdate) {
        // Le receiver disparaît seulement quand l'UI s'arrête
        if self.tx.send(update).is_err() {
            warn!("UI channel closed, dropping display update");
        }
    }
}

impl DisplaySink for ChannelSink {
    fn show_quote(&mut self, view: QuoteView) {
        self.send(DisplayUpdate::Quote(view));
    }

    fn update_row(&mut self, row: WatchlistRow) {
        self.send(DisplayUpdate::Row(row));
    }

    fn refreshed(&mut self) {
        self.send(DisplayUpdate::Refreshed);
    }
}

/// Enregistre les mises à jour dans l'ordre de réception
impl DisplaySink for Vec<DisplayUpdate> {
    fn show_quote(&mut self, view: QuoteView) {
        self.push(DisplayUpdate::Quote(view));
    }

    fn update_row(&mut self, row: WatchlistRow) {
        self.push(DisplayUpdate::Row(row));
    }

    fn refreshed(&mut self) {
        self.push(DisplayUpdate::Refreshed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ticker;

    #[test]
    fn test_channel_sink_forwards_updates() {
        let (tx, rx) = mpsc::channel();
        let mut sink = ChannelSink::new(tx);
        let ticker = Ticker::parse("AAPL").unwrap();

        sink.show_quote(QuoteView::Unavailable {
            ticker: ticker.clone(),
        });
        sink.refreshed();

        assert_eq!(
            rx.try_recv().unwrap(),
            DisplayUpdate::Quote(QuoteView::Unavailable { ticker })
        );
        assert_eq!(rx.try_recv().unwrap(), DisplayUpdate::Refreshed);
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        sink.refreshed();
    }
}
