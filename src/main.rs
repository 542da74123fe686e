// ============================================================================
// MoneyMuffin - Suivi de portefeuilles personnels
// ============================================================================
// Programme TUI : portefeuilles multi-devises, solde total et dérive
// depuis la dernière remise à zéro, persistés localement
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui alterne rendu et gestion des événements
// 3. Single-threaded : aucune tâche de fond, aucun Arc/Mutex nécessaire
// ============================================================================

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use moneymuffin::app::{App, PendingConfirmation, Screen};
use moneymuffin::clock::SystemClock;
use moneymuffin::config::{Config, DEFAULT_LOG_FILTER, LOG_FILE_NAME};
use moneymuffin::ledger::SortKey;
use moneymuffin::storage::FileStore;
use moneymuffin::ui::{events::EventHandler, render, Event};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ./logs/moneymuffin.log.*
/// RUST_LOG=moneymuffin=trace cargo run
/// MONEYMUFFIN_LOG_DIR=/tmp/mm cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), LOG_FILE_NAME);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG prioritaire, sinon debug pour moneymuffin et info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::from_env();

    // Si le logging échoue, on continue quand même
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    // Réhydrate l'état avant d'entrer en mode TUI
    let storage = FileStore::new(config.data_dir.clone());
    info!(data_dir = ?storage.dir(), "MoneyMuffin starting up");
    let mut app = App::load(Box::new(storage), Box::new(SystemClock));

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Boucle principale : rendu puis événement, jusqu'à app.running == false
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    while app.is_running() {
        terminal.draw(|frame| render(frame, app))?;

        match events.next() {
            Ok(event) => handle_event(app, event),
            Err(e) => error!(error = %e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// CONCEPT : Event Handler Pattern
// - Priorité : Ctrl+C, confirmation en attente, message, puis écran courant
// - Les refus (portefeuille verrouillé, saisie invalide) produisent déjà
//   un message dans App : les Result sont ignorés ici
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
fn handle_event(app: &mut App, event: Event) {
    use moneymuffin::ui::events::{is_confirm_event, is_interrupt_event, is_quit_event};

    if matches!(event, Event::Tick) {
        return;
    }

    if is_interrupt_event(&event) {
        info!("Interrupted, quitting");
        app.quit();
        return;
    }

    // CONCEPT : Confirmation two-step
    // - 'y' confirme, 'q' aussi pour quitter
    // - Toute autre touche annule
    if let Some(pending) = app.pending {
        let confirmed = is_confirm_event(&event)
            || (pending == PendingConfirmation::Quit && is_quit_event(&event));
        if confirmed {
            app.confirm_pending();
        } else {
            app.cancel_pending();
        }
        return;
    }

    // Un message se ferme avec n'importe quelle touche ; sur le dashboard
    // la touche est consommée, dans le formulaire elle continue
    if app.notice.is_some() {
        app.dismiss_notice();
        if app.current_screen == Screen::Dashboard {
            return;
        }
    }

    match app.current_screen {
        Screen::Dashboard => handle_dashboard_event(app, &event),
        Screen::WalletForm => handle_form_event(app, &event),
        Screen::CurrencyPicker => handle_picker_event(app, &event),
    }
}

/// CONCEPT RUST : Pattern matching avec guards
fn handle_dashboard_event(app: &mut App, event: &Event) {
    use moneymuffin::ui::events::{
        is_add_event, is_clear_all_event, is_currency_picker_event, is_delete_event,
        is_down_event, is_duplicate_event, is_edit_event, is_enter_event, is_lock_event,
        is_quit_event, is_reset_drift_event, is_sort_amount_event, is_sort_name_event,
        is_up_event,
    };

    let selected = app.selected_id();

    match event {
        e if is_quit_event(e) => {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        e if is_up_event(e) => app.navigate_up(),
        e if is_down_event(e) => app.navigate_down(),
        e if is_add_event(e) => {
            info!("User opened add form");
            app.open_create_form();
        }
        e if is_edit_event(e) || is_enter_event(e) => {
            if let Some(id) = selected {
                let _ = app.open_edit_form(id);
            }
        }
        e if is_delete_event(e) => {
            if let Some(id) = selected {
                let _ = app.request_delete(id);
            }
        }
        e if is_duplicate_event(e) => {
            if let Some(id) = selected {
                let _ = app.duplicate_wallet(id);
            }
        }
        e if is_lock_event(e) => {
            if let Some(id) = selected {
                let _ = app.toggle_lock(id);
            }
        }
        e if is_sort_name_event(e) => app.toggle_sort(SortKey::Name),
        e if is_sort_amount_event(e) => app.toggle_sort(SortKey::Amount),
        e if is_currency_picker_event(e) => {
            if !app.open_currency_picker() {
                debug!("Currency picker unavailable with a single currency");
            }
        }
        e if is_reset_drift_event(e) => {
            info!(currency = %app.display_currency, "User reset balance drift");
            app.reset_drift();
        }
        e if is_clear_all_event(e) => {
            app.request_clear_all();
        }
        _ => {}
    }
}

/// Formulaire : les lettres sont saisies, seules les touches spéciales naviguent
fn handle_form_event(app: &mut App, event: &Event) {
    use moneymuffin::ui::events::{
        get_char_from_event, is_backspace_event, is_backtab_event, is_enter_event,
        is_escape_event, is_left_event, is_right_event, is_tab_event,
    };

    if is_escape_event(event) {
        info!("User cancelled form");
        app.close_form();
        return;
    }

    if is_enter_event(event) {
        let _ = app.submit_form();
        return;
    }

    let Some(form) = app.form.as_mut() else {
        return;
    };

    match event {
        e if is_tab_event(e) => form.focus_next(),
        e if is_backtab_event(e) => form.focus_previous(),
        e if is_right_event(e) => form.cycle_next(),
        e if is_left_event(e) => form.cycle_previous(),
        e if is_backspace_event(e) => form.backspace(),
        e => {
            if let Some(c) = get_char_from_event(e) {
                form.input_char(c);
            }
        }
    }
}

fn handle_picker_event(app: &mut App, event: &Event) {
    use moneymuffin::ui::events::{
        is_currency_picker_event, is_down_event, is_enter_event, is_escape_event, is_up_event,
    };

    match event {
        e if is_up_event(e) => app.picker_up(),
        e if is_down_event(e) => app.picker_down(),
        e if is_enter_event(e) => app.picker_select(),
        e if is_escape_event(e) || is_currency_picker_event(e) => app.close_picker(),
        _ => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal dans son état d'origine
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use moneymuffin::clock::FixedClock;
    use moneymuffin::storage::{MemoryStore, Snapshot};

    fn app() -> App {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(), 1);
        App::new(Snapshot::defaults(), Box::new(MemoryStore::new()), Box::new(clock))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::empty())));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_quit_needs_two_presses() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.is_running());
        press(&mut app, KeyCode::Char('j'));
        assert!(app.is_running());
        assert!(app.pending.is_none());

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_add_wallet_through_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.current_screen, Screen::WalletForm);

        // 'q' et 'j' sont du texte dans le formulaire
        type_text(&mut app, "jq");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "42");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.current_screen, Screen::Dashboard);
        assert!(app.is_running());
        assert_eq!(app.wallets()[0].name, "jq");
        assert_eq!(app.wallets()[0].amount, 42.0);
    }

    #[test]
    fn test_invalid_form_keeps_typing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert!(app.notice.is_some());
        assert_eq!(app.current_screen, Screen::WalletForm);

        // La touche suivante ferme le message et reste saisie
        type_text(&mut app, "x");
        assert!(app.notice.is_none());
        assert_eq!(app.form.as_ref().map(|f| f.name.as_str()), Some("x"));
    }

    #[test]
    fn test_delete_with_confirmation() {
        let mut app = app();
        let before = app.wallets().len();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.wallets().len(), before - 1);
    }

    #[test]
    fn test_clear_all_with_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('X'));
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.wallets().is_empty());

        press(&mut app, KeyCode::Char('X'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.wallets().is_empty());
        assert!(app.baselines().is_empty());
    }
}
