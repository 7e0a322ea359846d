//! `TaskFlow` — terminal task-management client.
//!
//! Launches the TUI and connects to the remote tasks API for persistence.
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/taskflow/config.toml`).
//!
//! ```bash
//! # Against the local stub server
//! cargo run --bin taskflow
//!
//! # Against a real deployment
//! cargo run --bin taskflow -- --api-url https://tasks.example.com --user-id alice
//!
//! # Or via environment variables
//! TASKFLOW_API_URL=https://tasks.example.com TASKFLOW_USER=alice cargo run
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskflow::app::App;
use taskflow::config::{CliArgs, ClientConfig};
use taskflow::sync::{self, SyncCommand, SyncEvent};
use taskflow::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api = %config.api_base_url, user = %config.user_id, "taskflow starting");

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskflow exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskflow.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new()
        .with_alert_ttl(config.alert_ttl_ticks)
        .with_timestamp_format(config.timestamp_format.clone());

    // Spawn the sync worker; it issues the initial fetch by itself. A
    // client that cannot even be constructed leaves the app in offline
    // mode: the load gate drops and the list stays empty.
    let (cmd_tx, mut evt_rx) = match sync::spawn_sync(&config.to_sync_config()) {
        Ok((tx, rx)) => (Some(tx), Some(rx)),
        Err(e) => {
            tracing::error!(error = %e, "failed to start sync worker");
            app.apply_event(SyncEvent::LoadFailed);
            (None, None)
        }
    };

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending sync events (non-blocking).
        if let Some(ref mut rx) = evt_rx {
            while let Ok(event) = rx.try_recv() {
                app.apply_event(event);
            }
        }

        // Step 3: Tick the transient alert.
        app.tick_alert();

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // handle_key_event returns Some(SyncCommand) when the user
            // action requires a network dispatch.
            if let Some(cmd) = app.handle_key_event(key)
                && let Some(ref tx) = cmd_tx
            {
                // A command that never reaches the worker gets no
                // confirmation event, so settle it as a failure here:
                // optimistic removals roll back, in-flight markers clear,
                // and the user sees the failure alert.
                let dropped = match tx.try_send(cmd) {
                    Ok(()) => None,
                    Err(mpsc::error::TrySendError::Full(cmd)) => {
                        tracing::warn!("sync channel full, command dropped");
                        Some(cmd)
                    }
                    Err(mpsc::error::TrySendError::Closed(cmd)) => {
                        tracing::warn!("sync worker gone, command dropped");
                        Some(cmd)
                    }
                };
                if let Some(event) = dropped.and_then(SyncCommand::into_failure_event) {
                    app.apply_event(event);
                }
            }
        }

        if app.should_quit {
            if let Some(ref tx) = cmd_tx {
                let _ = tx.try_send(SyncCommand::Shutdown);
            }
            return Ok(());
        }
    }
}
