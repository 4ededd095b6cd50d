// ============================================================================
// Structure : RefreshScheduler
// ============================================================================
// Rafraîchissement périodique des deux vues
//
// Machine à deux états :
//   Idle --activate()--> Active
// Pas de retour possible : le timer vit jusqu'à l'arrêt du processus.
//
// Un cycle = QuoteDisplayState::refresh_current() PUIS
//            WatchlistStore::refresh_all(), toujours dans cet ordre.
// Un échec dans l'un n'empêche jamais l'autre.
// ============================================================================

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::quote_display::QuoteDisplayState;
use crate::sink::DisplaySink;
use crate::watchlist::WatchlistStore;

/// État du scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Avant le premier armement du timer
    Idle,

    /// Timer armé, un cycle par période
    Active,
}

/// Origine d'un cycle (pour les logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Timer,
    Manual,
}

/// Bilan d'un cycle de rafraîchissement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// La vue Quote a été rafraîchie (un ticker était sélectionné)
    pub quote_refreshed: bool,

    /// La vue Quote affiche un échec après ce cycle
    pub quote_failed: bool,

    /// Entrées de watchlist mises à jour
    pub rows_updated: usize,

    /// Entrées de watchlist restées sur leurs anciens prix
    pub rows_failed: usize,
}

/// Déclenche les rafraîchissements à période fixe
pub struct RefreshScheduler {
    period: Duration,
    state: SchedulerState,
    cycles: u64,
}

impl RefreshScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: SchedulerState::Idle,
            cycles: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Nombre de cycles exécutés (timer et manuels)
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Passe de Idle à Active et arme le timer
    ///
    /// Le premier tick arrive une période après l'armement. Si un cycle
    /// déborde, le tick suivant est décalé plutôt que rattrapé en rafale.
    /// Renvoie None si le scheduler est déjà actif.
    pub fn activate(&mut self) -> Option<Interval> {
        if self.state == SchedulerState::Active {
            return None;
        }

        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.state = SchedulerState::Active;
        info!(period = ?self.period, "Refresh timer armed");
        Some(interval)
    }

    /// Exécute un cycle complet et pousse les résultats vers l'affichage
    ///
    /// Utilisé pour les ticks du timer comme pour le rafraîchissement manuel ;
    /// ne touche pas au timer, donc un cycle manuel ne décale pas sa phase.
    pub async fn run_cycle(
        &mut self,
        trigger: Trigger,
        quote: &mut QuoteDisplayState,
        watchlist: &mut WatchlistStore,
        sink: &mut dyn DisplaySink,
    ) -> CycleReport {
        let mut report = CycleReport::default();

        if let Some(view) = quote.refresh_current().await {
            report.quote_refreshed = true;
            report.quote_failed = view.is_failure();
            sink.show_quote(view);
        }

        let refresh = watchlist.refresh_all().await;
        report.rows_updated = refresh.updated.len();
        report.rows_failed = refresh.failed.len();
        for row in refresh.updated {
            sink.update_row(row);
        }

        sink.refreshed();
        self.cycles += 1;

        debug!(
            ?trigger,
            cycle = self.cycles,
            quote_refreshed = report.quote_refreshed,
            rows_updated = report.rows_updated,
            rows_failed = report.rows_failed,
            "Refresh cycle done"
        );
        report
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::scripted::{Scripted, ScriptedProvider};
    use crate::models::{QuoteSnapshot, Ticker};
    use crate::quote_display::QuoteView;
    use crate::sink::DisplayUpdate;
    use crate::storage::WatchlistFile;

    struct Harness {
        _dir: tempfile::TempDir,
        provider: Arc<ScriptedProvider>,
        quote: QuoteDisplayState,
        watchlist: WatchlistStore,
    }

    fn harness(provider: ScriptedProvider) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(provider);
        let file = WatchlistFile::new(dir.path().join("watchlist.json"));
        Harness {
            quote: QuoteDisplayState::new(provider.clone()),
            watchlist: WatchlistStore::new(file, provider.clone()),
            provider,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_cycle_refreshes_quote_before_watchlist() {
        let mut h = harness(
            ScriptedProvider::new()
                .price("AAPL", 150.0, 152.0)
                .price("MSFT", 400.0, 398.0),
        );
        h.watchlist.add("MSFT").await.unwrap();
        h.quote.update(Ticker::parse("AAPL").unwrap()).await;

        let mut scheduler = RefreshScheduler::new(Duration::from_secs(2));
        let mut sink: Vec<DisplayUpdate> = Vec::new();
        let report = scheduler
            .run_cycle(Trigger::Timer, &mut h.quote, &mut h.watchlist, &mut sink)
            .await;

        // add MSFT, update AAPL, puis le cycle : AAPL avant MSFT
        assert_eq!(h.provider.calls(), vec!["MSFT", "AAPL", "AAPL", "MSFT"]);
        assert!(matches!(sink[0], DisplayUpdate::Quote(QuoteView::Quote { .. })));
        assert!(matches!(sink[1], DisplayUpdate::Row(ref row) if row.ticker.as_str() == "MSFT"));
        assert_eq!(sink[2], DisplayUpdate::Refreshed);
        assert_eq!(report.rows_updated, 1);
        assert_eq!(scheduler.cycles(), 1);
    }

    #[tokio::test]
    async fn test_cycle_without_query_only_touches_watchlist() {
        let mut h = harness(ScriptedProvider::new().price("MSFT", 400.0, 398.0));
        h.watchlist.add("MSFT").await.unwrap();

        let mut scheduler = RefreshScheduler::new(Duration::from_secs(2));
        let mut sink: Vec<DisplayUpdate> = Vec::new();
        let report = scheduler
            .run_cycle(Trigger::Manual, &mut h.quote, &mut h.watchlist, &mut sink)
            .await;

        assert!(!report.quote_refreshed);
        assert!(!sink.iter().any(|u| matches!(u, DisplayUpdate::Quote(_))));
    }

    #[tokio::test]
    async fn test_quote_failure_does_not_block_watchlist() {
        let mut h = harness(
            ScriptedProvider::new()
                .price("AAPL", 150.0, 152.0)
                .price("MSFT", 400.0, 398.0),
        );
        h.watchlist.add("MSFT").await.unwrap();
        h.quote.update(Ticker::parse("AAPL").unwrap()).await;
        h.provider.push("AAPL", Scripted::Fail("down".to_string()));
        h.provider.push("MSFT", Scripted::Quote(QuoteSnapshot::priced(405.0, 398.0)));

        let mut scheduler = RefreshScheduler::new(Duration::from_secs(2));
        let mut sink: Vec<DisplayUpdate> = Vec::new();
        let report = scheduler
            .run_cycle(Trigger::Timer, &mut h.quote, &mut h.watchlist, &mut sink)
            .await;

        assert!(report.quote_failed);
        assert_eq!(report.rows_updated, 1);
        assert_eq!(h.watchlist.entries()[0].price(), 405.0);
    }

    #[tokio::test]
    async fn test_failing_entry_keeps_displayed_price_after_tick() {
        let mut h = harness(ScriptedProvider::new().price("IBM", 100.0, 98.0));
        h.watchlist.add("IBM").await.unwrap();
        h.provider.push("IBM", Scripted::Fail("HTTP 500".to_string()));

        let mut scheduler = RefreshScheduler::new(Duration::from_secs(2));
        let mut sink: Vec<DisplayUpdate> = Vec::new();
        let report = scheduler
            .run_cycle(Trigger::Timer, &mut h.quote, &mut h.watchlist, &mut sink)
            .await;

        assert_eq!(report.rows_failed, 1);
        assert_eq!(h.watchlist.entries()[0].price(), 100.0);
        // Aucune ligne envoyée : l'affichage garde $100
        assert_eq!(sink, vec![DisplayUpdate::Refreshed]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activate_arms_timer_once() {
        let mut scheduler = RefreshScheduler::new(Duration::from_secs(2));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        let start = Instant::now();
        let mut interval = scheduler.activate().unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Active);
        assert!(scheduler.activate().is_none());

        interval.tick().await;
        assert_eq!(start.elapsed(), scheduler.period());
        interval.tick().await;
        assert_eq!(start.elapsed(), scheduler.period() * 2);
    }
}
