// ============================================================================
// quoteterm - Terminal de cotations
// ============================================================================
// Deux onglets : la cotation d'un ticker et une watchlist persistée,
// rafraîchis toutes les 2 secondes depuis Yahoo Finance.
//
// Threads :
// 1. Thread UI (ici) : terminal, clavier, rendu
// 2. Thread worker : état métier, fetchs, timer de rafraîchissement
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

use quoteterm::api::YahooProvider;
use quoteterm::app::App;
use quoteterm::config::Config;
use quoteterm::sink::{ChannelSink, DisplayUpdate};
use quoteterm::ui::{render, Event, EventHandler};
use quoteterm::worker::{spawn_worker, Command};

// ============================================================================
// Initialisation du logging
// ============================================================================
// La TUI occupe stdout : on log vers un fichier avec rotation quotidienne.
//
// # Utilisation
// ```bash
// tail -f logs/quoteterm.log
// RUST_LOG=quoteterm=trace cargo run
// ```
// ============================================================================

fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(&config.log_dir)
        .context("Échec de la création du répertoire de logs")?;

    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, config.log_dir.clone(), "quoteterm.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quoteterm=debug,info".into()),
        )
        .init();

    info!(log_dir = ?config.log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(watchlist = ?config.watchlist_path, period = ?config.refresh_period, "quoteterm starting up");

    let provider = YahooProvider::new(config.request_timeout)
        .context("Échec de la création du client HTTP")?;

    // Le worker pousse ses mises à jour dans ce channel, l'UI les dépile
    let (update_tx, update_rx) = mpsc::channel::<DisplayUpdate>();
    let (command_tx, worker) = spawn_worker(config, Arc::new(provider), ChannelSink::new(update_tx));

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new();
    let events = EventHandler::default();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &update_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Le worker peut être au milieu d'un fetch : on ne l'attend pas
    let _ = command_tx.send(Command::Shutdown);
    drop(worker);

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Dépiler les mises à jour du worker
//   1. Dessiner l'interface
//   2. Traiter un événement clavier (ou Tick après 250ms)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &UnboundedSender<Command>,
    update_rx: &mpsc::Receiver<DisplayUpdate>,
) -> Result<()> {
    while app.is_running() {
        // Non-bloquant : on vide tout ce qui est arrivé depuis le dernier tour
        loop {
            match update_rx.try_recv() {
                Ok(update) => app.apply(update),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker thread disconnected!");
                    break;
                }
            }
        }

        terminal.draw(|frame| render(frame, app))?;

        match events.next() {
            Ok(event) => {
                if let Some(command) = handle_event(app, event) {
                    debug!(?command, "Sending command to worker");
                    if command_tx.send(command).is_err() {
                        error!("Worker channel closed, command dropped");
                    }
                }
            }
            Err(e) => debug!(error = ?e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Met à jour l'état de l'UI et retourne éventuellement une commande
/// pour le worker
fn handle_event(app: &mut App, event: Event) -> Option<Command> {
    use quoteterm::ui::events::{
        is_backspace_event, is_down_event, is_edit_event, is_enter_event, is_escape_event,
        is_quit_event, is_refresh_event, is_tab_event, is_up_event, ticker_char,
    };

    if let Event::Tick = event {
        return None;
    }

    // ========================================
    // Input Mode : les touches vont dans le buffer
    // ========================================
    if app.is_in_input_mode() {
        if is_escape_event(&event) {
            app.cancel_input();
        } else if is_enter_event(&event) {
            let command = app.submit_input();
            if let Some(command) = &command {
                info!(?command, "User submitted ticker");
            }
            return command;
        } else if is_backspace_event(&event) {
            app.backspace();
        } else if let Some(c) = ticker_char(&event) {
            app.append_char(c);
        }
        return None;
    }

    // ========================================
    // Mode normal
    // ========================================
    if is_quit_event(&event) {
        info!("User quit");
        app.quit();
    } else if is_refresh_event(&event) {
        info!("User requested manual refresh");
        return Some(Command::Refresh);
    } else if is_tab_event(&event) {
        app.next_tab();
    } else if is_edit_event(&event) {
        app.start_input();
    } else if is_up_event(&event) {
        app.navigate_up();
    } else if is_down_event(&event) {
        app.navigate_down();
    }

    None
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
