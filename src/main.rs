// ============================================================================
// RBravo - Cotações e carteira
// ============================================================================
// Programme TUI : cotation BTC / LTC en USD (revalidée périodiquement) et
// historique des transactions reçues par une adresse Bitcoin
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Worker thread : les appels HTTP tournent dans un runtime tokio séparé
// 4. Pas de Mutex : App appartient à la boucle, le worker renvoie des Outcome
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use rbravo::api::{ChainSoClient, ExplorerApi};
use rbravo::app::App;
use rbravo::config::Config;
use rbravo::ui::{events::EventHandler, render, Event};
use rbravo::worker::{spawn_worker, Command, Outcome};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place (config.log_dir)
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f logs/rbravo.log.*
/// RUST_LOG=rbravo=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "rbravo.log");

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
            // Par défaut : debug pour rbravo, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rbravo=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Configuration d'abord : elle donne le répertoire des logs
    let config = Config::load().context("Configuration invalide")?;

    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "RBravo starting up");

    // CONCEPT RUST : Trait object partagé
    // - Arc<dyn ExplorerApi> : le worker ne connaît que le trait
    let api: Arc<dyn ExplorerApi> = Arc::new(ChainSoClient::from_config(&config)?);

    let (command_tx, command_rx) = mpsc::channel::<Command>();
    let (outcome_tx, outcome_rx) = mpsc::channel::<Outcome>();

    info!("Spawning background worker thread");
    let worker = spawn_worker(api, command_rx, outcome_tx);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::from_config(&config);
    let events = EventHandler::default();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &outcome_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Fermer le channel arrête le worker ; les requêtes en vol sont abandonnées
    drop(command_tx);
    if worker.join().is_err() {
        warn!("Worker thread panicked");
    }

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
//   0. Appliquer les résultats du worker
//   1. Dessiner l'interface
//   2. Traiter un événement
//   3. Revalidation périodique du prix
// ============================================================================

/// Envoie une commande au worker ; si le worker est mort, l'échec est
/// appliqué immédiatement pour ne pas rester bloqué en chargement
fn dispatch(app: &mut App, command_tx: &mpsc::Sender<Command>, command: Command) {
    debug!(?command, "Dispatching command");
    if let Err(mpsc::SendError(command)) = command_tx.send(command) {
        error!(?command, "Worker unavailable, command dropped");
        app.command_failed(command);
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<Command>,
    outcome_rx: &mpsc::Receiver<Outcome>,
) -> Result<()> {
    while app.is_running() {
        // ========================================
        // 0. RÉSULTATS : vide la file sans bloquer
        // ========================================
        loop {
            match outcome_rx.try_recv() {
                Ok(outcome) => {
                    if !app.apply_outcome(outcome) {
                        debug!("Stale outcome ignored");
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker thread disconnected!");
                    break;
                }
            }
        }

        // ========================================
        // 1. RENDER
        // ========================================
        let view: &App = app;
        terminal.draw(|frame| render(frame, view))?;

        // ========================================
        // 2. INPUT
        // ========================================
        match events.next() {
            Ok(event) => handle_event(app, event, command_tx),
            Err(e) => warn!(error = ?e, "Failed to read terminal event"),
        }

        // ========================================
        // 3. UPDATE : revalidation due ?
        // ========================================
        if let Some(command) = app.tick(Instant::now()) {
            dispatch(app, command_tx, command);
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Le mode saisie est testé en premier : il capture toutes les touches
/// - Toute autre touche annule la confirmation de sortie
fn handle_event(app: &mut App, event: Event, command_tx: &mpsc::Sender<Command>) {
    use rbravo::ui::events::{
        get_char_from_event, is_address_char_event, is_address_event, is_backspace_event,
        is_enter_event, is_escape_event, is_next_page_event, is_order_event,
        is_previous_page_event, is_quit_event, is_refresh_event, is_sidebar_event,
        is_sort_event, is_tab_event, page_shortcut,
    };

    match event {
        // ========================================
        // Input Mode : saisie de l'adresse
        // ========================================
        Event::Key(_) if is_escape_event(&event) && app.is_in_input_mode() => {
            info!("User cancelled input");
            app.cancel_input();
        }

        Event::Key(_) if is_enter_event(&event) && app.is_in_input_mode() => {
            match app.submit_input() {
                Some(command) => {
                    info!(?command, "User submitted wallet address");
                    dispatch(app, command_tx, command);
                }
                None => debug!("Empty address, ignoring"),
            }
        }

        Event::Key(_) if is_backspace_event(&event) && app.is_in_input_mode() => {
            app.backspace();
        }

        Event::Key(_) if is_address_char_event(&event) && app.is_in_input_mode() => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }

        // Autres touches en mode saisie : ignorées
        Event::Key(_) if app.is_in_input_mode() => {}

        // ========================================
        // Dashboard
        // ========================================
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step : première pression -> confirmation, deuxième -> sortie
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) => {
            app.cancel_quit();

            if let Some(symbol) = page_shortcut(&event) {
                app.show_page(symbol);
            } else if is_tab_event(&event) {
                app.next_page();
            } else if is_sidebar_event(&event) {
                app.toggle_sidebar();
            } else if is_refresh_event(&event) {
                info!(page = %app.page(), "User requested price refresh");
                let command = app.refresh_price(Instant::now());
                dispatch(app, command_tx, command);
            } else if is_address_event(&event) {
                app.start_input();
            } else if is_sort_event(&event) {
                app.cycle_sort();
            } else if is_order_event(&event) {
                app.toggle_sort_order();
            } else if is_next_page_event(&event) {
                app.next_table_page();
            } else if is_previous_page_event(&event) {
                app.previous_table_page();
            }
        }

        Event::FocusGained => {
            if let Some(command) = app.on_focus_gained(Instant::now()) {
                debug!("Terminal focus regained, revalidating price");
                dispatch(app, command_tx, command);
            }
        }

        Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI
///
/// EnableFocusChange : le terminal signale FocusGained quand on revient
/// sur la fenêtre (revalidation du prix)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableFocusChange)?;
    terminal.show_cursor()?;
    Ok(())
}
