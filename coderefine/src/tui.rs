//! Terminal lifecycle: raw mode, alternate screen, mouse capture, bracketed
//! paste, and the panic/SIGTERM plumbing that guarantees they are undone.
//!
//! The UI draws to stderr so stdout stays free for shell pipelines.

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stderr, BufWriter, Stderr};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// CrosstermBackend over a buffered stderr writer. Buffering batches escape
/// sequences into fewer writes per frame.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// Enters raw mode and the alternate screen. Pair every call with
/// [`restore_tui`].
///
/// # Errors
///
/// Returns an I/O error if raw mode cannot be enabled or the setup escape
/// sequences cannot be written.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stderr());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Undoes [`init_tui`]. Idempotent; ratatui does not restore on `Drop`.
///
/// # Errors
///
/// Returns an I/O error if raw mode cannot be disabled or stderr is closed.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stderr(), DisableBracketedPaste, LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Chains a panic hook that restores the terminal before the original hook
/// prints the message. Install before [`init_tui`].
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Returns a flag that flips to `true` on SIGTERM. The main loop polls it.
///
/// # Panics
///
/// Panics if the OS refuses to register the handler; treated as a fatal
/// startup error.
pub fn register_sigterm() -> Arc<AtomicBool> {
    let term = Arc::new(AtomicBool::new(false));
    register(SIGTERM, Arc::clone(&term)).expect("Failed to register SIGTERM handler");
    term
}
