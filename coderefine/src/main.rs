//! coderefine - terminal client for the CodeRefine AI code review service.
//!
//! Entry point for the `coderefine` binary. Wires together the terminal
//! lifecycle (`tui`), the event bus (`event`), the API workers (`worker`), the
//! UI (`ui`) and the persisted session from `coderefine-core`.
//!
//! # Startup sequence
//!
//! 1. Parse flags, start file logging, load config. All before the terminal
//!    is touched, so failures can still print to stderr.
//! 2. Open the session store and build the API client.
//! 3. `install_panic_hook()` then `register_sigterm()`.
//! 4. `init_tui()` enters the alternate screen.
//! 5. Spawn the input task and the session watcher.
//!
//! `restore_tui()` runs once after the loop exits, whatever the reason. The
//! `?` operator is only used before `init_tui()`; a draw error leaves the
//! loop via `break` and is returned after the terminal is restored.

mod app;
mod clipboard;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;
mod worker;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;

use coderefine_core::{ApiClient, SessionStore};

use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, handle_paste, KeyAction};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = config::Cli::parse();
    if let Err(e) = logging::init() {
        eprintln!("coderefine: logging disabled: {e}");
    }
    let config = config::Config::load(&cli);
    let theme = theme::Theme::from_name(&config.theme);
    tracing::info!(api_url = %config.api_url, "using backend");

    let store = match SessionStore::open(&config.storage_path).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                "cannot open session storage at {}: {e}; sign-in will not persist",
                config.storage_path.display()
            );
            Arc::new(SessionStore::in_memory())
        }
    };
    let client = ApiClient::new(config.api_url.clone(), config.timeout(), Arc::clone(&store));

    let mut state = app::AppState::new(&config);
    state.bootstrap(store.current());

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm();
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    worker::spawn_session_watcher(&store, handler.tx.clone());
    let tx = handler.tx;
    let mut rx = handler.rx;

    // Requests queued by bootstrap (profile check, dashboard fetch).
    for request in state.drain_outbox() {
        worker::dispatch(&client, request, &tx);
    }

    let mut result = Ok(());

    // Exits only via `break` so `restore_tui()` below is always reached.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is polled at least every 50ms even when the
            // bus is quiet.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            tracing::error!("draw failed: {e}");
                            result = Err(e);
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        if handle_mouse(mouse, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Paste(text)) => handle_paste(&text, &mut state),
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => {}
                    Some(AppEvent::Tick) => state.on_tick(),
                    Some(AppEvent::Api(response)) => state.apply_response(*response),
                    Some(AppEvent::SessionChanged(session)) => state.on_session_changed(session),
                    None => break 'event_loop,
                }

                for request in state.drain_outbox() {
                    worker::dispatch(&client, request, &tx);
                }

                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui()?;
    tracing::info!("coderefine exiting");
    result
}
