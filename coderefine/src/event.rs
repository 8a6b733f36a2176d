//! Event bus for coderefine.
//!
//! Terminal input, timer ticks, API responses and session changes all arrive
//! as one `AppEvent` over a tokio unbounded MPSC channel. The main loop is the
//! only consumer.
//!
//! Rendering and logic run on separate intervals:
//! - render every 33 ms (about 30 FPS), which triggers `terminal.draw()`;
//! - tick every 250 ms, which ages transient notices and spinners.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use coderefine_core::types::Session;

use crate::worker::ApiResponse;

/// All events the application can receive from any source.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only; release and repeat are
    /// dropped in [`spawn_event_task`]).
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Text pasted into the terminal (bracketed paste).
    Paste(String),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    Tick,
    Render,
    /// Answer to a request issued through [`crate::worker::dispatch`].
    Api(Box<ApiResponse>),
    /// The shared session was saved or cleared.
    SessionChanged(Option<Session>),
}

/// Sender and receiver ends of the event channel.
///
/// `tx` is cloned into every background task; `rx` is owned by the main loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that turns crossterm input and the two timers into
/// `AppEvent`s.
///
/// `reader.next().fuse()` keeps `select!` from polling a finished stream. The
/// task stops when the input stream ends; send errors are ignored because a
/// closed receiver means the app is already shutting down.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            tokio::select! {
                _ = tick_tick => {
                    let _ = tx.send(AppEvent::Tick);
                }
                _ = render_tick => {
                    let _ = tx.send(AppEvent::Render);
                }
                maybe_event = crossterm_event => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if key.kind == KeyEventKind::Press {
                                let _ = tx.send(AppEvent::Key(key));
                            }
                        }
                        Some(Ok(Event::Resize(w, h))) => {
                            let _ = tx.send(AppEvent::Resize(w, h));
                        }
                        Some(Ok(Event::Mouse(mouse))) => {
                            let _ = tx.send(AppEvent::Mouse(mouse));
                        }
                        Some(Ok(Event::Paste(text))) => {
                            let _ = tx.send(AppEvent::Paste(text));
                        }
                        Some(Err(e)) => {
                            tracing::warn!("terminal input error: {e}");
                        }
                        None => break,
                        _ => {}
                    }
                }
            }
        }
    });
}
