// ============================================================================
// Background Worker
// ============================================================================
// Seul propriétaire (et seul écrivain) de l'état métier :
// WatchlistStore, QuoteDisplayState et RefreshScheduler.
//
// CONCEPT : Command pattern avec channels
// - Le thread UI envoie des Command via un channel tokio
// - Le worker les traite une par une, entrelacées avec les ticks du timer
//   dans une seule boucle tokio::select!
// - Les résultats repartent vers l'UI par le DisplaySink
//
// Comme tout passe par cette boucle, deux mises à jour ne peuvent jamais
// s'entrelacer : un fetch lent retarde simplement la suite.
// ============================================================================

use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::api::QuoteProvider;
use crate::config::Config;
use crate::error::AddError;
use crate::models::Ticker;
use crate::quote_display::QuoteDisplayState;
use crate::scheduler::{RefreshScheduler, Trigger};
use crate::sink::DisplaySink;
use crate::storage::WatchlistFile;
use crate::watchlist::WatchlistStore;

/// Commandes envoyées au worker par le thread UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Afficher la cotation d'un ticker dans la vue Quote
    Query(String),

    /// Ajouter un ticker à la watchlist
    Add(String),

    /// Rafraîchissement manuel (touche 'r')
    Refresh,

    /// Arrêt propre du worker
    Shutdown,
}

/// État métier + sortie d'affichage
pub struct Worker<S: DisplaySink> {
    watchlist: WatchlistStore,
    quote: QuoteDisplayState,
    scheduler: RefreshScheduler,
    sink: S,
}

impl<S: DisplaySink> Worker<S> {
    pub fn new(
        watchlist: WatchlistStore,
        quote: QuoteDisplayState,
        scheduler: RefreshScheduler,
        sink: S,
    ) -> Self {
        Self {
            watchlist,
            quote,
            scheduler,
            sink,
        }
    }

    /// Construit le worker à partir de la configuration
    pub fn from_config(config: &Config, provider: Arc<dyn QuoteProvider>, sink: S) -> Self {
        let storage = WatchlistFile::new(config.watchlist_path.clone());
        Self::new(
            WatchlistStore::new(storage, provider.clone()),
            QuoteDisplayState::new(provider),
            RefreshScheduler::new(config.refresh_period),
            sink,
        )
    }

    pub fn watchlist(&self) -> &WatchlistStore {
        &self.watchlist
    }

    pub fn quote(&self) -> &QuoteDisplayState {
        &self.quote
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Charge la watchlist persistée et affiche ses lignes
    pub async fn start(&mut self) {
        let report = self.watchlist.load().await;
        info!(
            loaded = report.loaded.len(),
            dropped = report.dropped.len(),
            skipped = report.skipped,
            "Watchlist loaded"
        );

        for row in self.watchlist.rows() {
            self.sink.update_row(row);
        }
    }

    /// Traite une commande ; renvoie false pour arrêter la boucle
    pub async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Query(input) => {
                // Saisie vide : ignorée, comme dans la vue d'origine
                let Ok(ticker) = Ticker::parse(&input) else {
                    debug!("Empty quote query, ignoring");
                    return true;
                };
                info!(ticker = %ticker, "Quote requested");
                let view = self.quote.update(ticker).await;
                if view.is_failure() {
                    debug!(ticker = %view.ticker(), "Quote view shows a failure");
                }
                self.sink.show_quote(view);
            }

            Command::Add(input) => match self.watchlist.add(&input).await {
                Ok(added) => self.sink.update_row(added.row),
                Err(AddError::Validation(reason)) => {
                    debug!(input = %input, reason = %reason, "Ticker not added");
                }
                Err(AddError::Fetch(e)) => {
                    // La vue watchlist n'a pas de canal d'erreur : log seulement
                    info!(input = %input, error = %e, "Ticker not added, no usable quote");
                }
            },

            Command::Refresh => {
                self.refresh(Trigger::Manual).await;
            }

            Command::Shutdown => {
                info!("Worker shutdown requested");
                return false;
            }
        }

        true
    }

    /// Un cycle complet : vue Quote puis watchlist
    pub async fn refresh(&mut self, trigger: Trigger) {
        self.scheduler
            .run_cycle(trigger, &mut self.quote, &mut self.watchlist, &mut self.sink)
            .await;
    }

    /// Boucle principale : chargement, armement du timer, puis commandes et
    /// ticks jusqu'à Shutdown ou fermeture du channel
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> Self {
        self.start().await;

        let Some(mut timer) = self.scheduler.activate() else {
            error!("Refresh scheduler was already active");
            return self;
        };

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let keep_running = match command {
                        Some(command) => self.handle(command).await,
                        None => false,
                    };
                    if !keep_running {
                        break;
                    }
                }
                _ = timer.tick() => {
                    self.refresh(Trigger::Timer).await;
                }
            }
        }

        info!(cycles = self.scheduler.cycles(), "Worker exiting");
        self
    }
}

/// Lance le worker dans un thread dédié avec son propre runtime tokio
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : thread OS séparé de l'UI
/// - Runtime::block_on() : exécute la boucle async du worker
pub fn spawn_worker<S>(
    config: Config,
    provider: Arc<dyn QuoteProvider>,
    sink: S,
) -> (mpsc::UnboundedSender<Command>, thread::JoinHandle<()>)
where
    S: DisplaySink + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let handle = thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime for worker");
                return;
            }
        };

        let worker = Worker::from_config(&config, provider, sink);
        runtime.block_on(worker.run(command_rx));
    });

    (command_tx, handle)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use super::*;
    use crate::api::scripted::ScriptedProvider;
    use crate::quote_display::QuoteView;
    use crate::scheduler::SchedulerState;
    use crate::sink::DisplayUpdate;

    fn worker(
        dir: &tempfile::TempDir,
        provider: ScriptedProvider,
    ) -> Worker<Vec<DisplayUpdate>> {
        let config = Config {
            watchlist_path: dir.path().join("watchlist.json"),
            ..Config::default()
        };
        Worker::from_config(&config, Arc::new(provider), Vec::new())
    }

    #[tokio::test]
    async fn test_start_emits_loaded_rows() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("watchlist.json"), r#"["AAPL","MSFT"]"#).unwrap();
        let mut worker = worker(
            &dir,
            ScriptedProvider::new().price("AAPL", 150.0, 152.0).fail("MSFT"),
        );

        worker.start().await;

        assert_eq!(worker.sink().len(), 1);
        assert!(matches!(&worker.sink()[0], DisplayUpdate::Row(row) if row.ticker.as_str() == "AAPL"));
    }

    #[tokio::test]
    async fn test_commands_update_state_and_sink() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker(
            &dir,
            ScriptedProvider::new()
                .price("AAPL", 150.0, 152.0)
                .price("TSLA", 250.0, 240.0),
        );

        assert!(worker.handle(Command::Query("aapl".to_string())).await);
        assert!(worker.handle(Command::Add("tsla".to_string())).await);
        assert!(worker.handle(Command::Add("TSLA".to_string())).await);
        assert!(worker.handle(Command::Query("  ".to_string())).await);

        assert_eq!(worker.watchlist().len(), 1);
        assert_eq!(worker.quote().current_ticker().unwrap().as_str(), "AAPL");
        assert_eq!(worker.sink().len(), 2);
        assert!(matches!(&worker.sink()[0], DisplayUpdate::Quote(QuoteView::Quote { .. })));
    }

    #[tokio::test]
    async fn test_manual_refresh_runs_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker(&dir, ScriptedProvider::new());

        assert!(worker.handle(Command::Refresh).await);

        assert_eq!(worker.scheduler().cycles(), 1);
        // Le cycle manuel n'arme pas le timer
        assert_eq!(worker.scheduler().state(), SchedulerState::Idle);
        assert_eq!(worker.sink(), &vec![DisplayUpdate::Refreshed]);
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker(&dir, ScriptedProvider::new());
        assert!(!worker.handle(Command::Shutdown).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_until_channel_closes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("watchlist.json"), r#"["AAPL"]"#).unwrap();
        let worker = worker(&dir, ScriptedProvider::new().price("AAPL", 150.0, 152.0));

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(4500)).await;
            tx.send(Command::Shutdown).unwrap();
        });

        let worker = worker.run(rx).await;
        task.await.unwrap();

        // Ticks à 2s et 4s, arrêt à 4.5s
        assert_eq!(worker.scheduler().cycles(), 2);
        assert_eq!(worker.scheduler().state(), SchedulerState::Active);
    }
}
