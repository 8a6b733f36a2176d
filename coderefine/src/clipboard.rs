//! System clipboard access through arboard.

/// Copies `text` to the system clipboard. Failures are logged, never raised.
///
/// On Linux the copy runs on its own thread and waits until a clipboard
/// manager has taken the data, since X11/Wayland drop the contents once the
/// owning `Clipboard` goes away.
pub fn copy(text: String) {
    tracing::debug!("copying {} chars to clipboard", text.len());

    #[cfg(target_os = "linux")]
    {
        std::thread::spawn(move || match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                use arboard::SetExtLinux;
                if let Err(e) = clipboard.set().wait().text(text) {
                    tracing::warn!("failed to copy to clipboard: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to access clipboard: {e}"),
        });
    }

    #[cfg(not(target_os = "linux"))]
    {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(text) {
                    tracing::warn!("failed to copy to clipboard: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to access clipboard: {e}"),
        }
    }
}
