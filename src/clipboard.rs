//! Copying the typed text to the system clipboard

use crate::error::Result;
use crate::state::InputState;
use async_trait::async_trait;
use std::time::Duration;
#[cfg(feature = "clipboard")]
use tokio::sync::oneshot;

/// Write-only text clipboard
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    /// Replace the clipboard contents with `text`
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Copies the current input text and raises the copy acknowledgement
pub struct ClipboardCopier<C> {
    clipboard: C,
}

impl<C: ClipboardSink> ClipboardCopier<C> {
    /// Copier writing to `clipboard`
    pub fn new(clipboard: C) -> Self {
        Self { clipboard }
    }

    /// Underlying clipboard
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Copy the raw input text. A rejected write is logged and leaves the flag alone.
    pub async fn copy_current_text(&self, input: &mut InputState) {
        match self.clipboard.write_text(input.text()).await {
            Ok(()) => {
                input.acknowledge_copy();
                tracing::debug!(chars = input.text().chars().count(), "Copied input to clipboard");
            }
            Err(err) => {
                tracing::error!(error = %err, "Error copying to clipboard");
            }
        }
    }
}

/// Clipboard that refuses every write, for builds without a clipboard backend
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

#[async_trait]
impl ClipboardSink for NoClipboard {
    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(crate::Error::ClipboardUnavailable(
            "built without the `clipboard` feature".to_string(),
        ))
    }
}

/// Clipboard used by [`crate::SystemForm`]
#[cfg(feature = "clipboard")]
pub type DefaultClipboard = SystemClipboard;

/// Clipboard used by [`crate::SystemForm`]
#[cfg(not(feature = "clipboard"))]
pub type DefaultClipboard = NoClipboard;

/// Default clipboard whose writes stay available for at least `hold`
#[cfg(feature = "clipboard")]
pub fn default_clipboard(hold: Duration) -> DefaultClipboard {
    SystemClipboard::new(hold)
}

/// Default clipboard whose writes stay available for at least `hold`
#[cfg(not(feature = "clipboard"))]
pub fn default_clipboard(_hold: Duration) -> DefaultClipboard {
    NoClipboard
}

/// Clipboard backed by `arboard`.
///
/// On X11 and Wayland the copied text only exists while its owner keeps serving
/// it, so each write keeps a clipboard handle alive on a blocking thread for
/// `hold` (or until another program takes the selection). The write itself
/// returns as soon as the text is in place.
#[cfg(feature = "clipboard")]
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    hold: Duration,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    /// Clipboard that keeps serving each write for `hold`
    pub fn new(hold: Duration) -> Self {
        Self { hold }
    }

    /// How long each write keeps being served
    pub fn hold(&self) -> Duration {
        self.hold
    }
}

#[cfg(feature = "clipboard")]
impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[cfg(feature = "clipboard")]
#[async_trait]
impl ClipboardSink for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let text = text.to_owned();
        let hold = self.hold;
        let (done_tx, done_rx) = oneshot::channel::<Result<()>>();

        // arboard talks to the windowing system synchronously
        tokio::task::spawn_blocking(move || {
            let mut clipboard = match arboard::Clipboard::new() {
                Ok(clipboard) => clipboard,
                Err(err) => {
                    let _ = done_tx.send(Err(err.into()));
                    return;
                }
            };
            if let Err(err) = clipboard.set_text(text.as_str()) {
                let _ = done_tx.send(Err(err.into()));
                return;
            }
            let _ = done_tx.send(Ok(()));
            serve_until(clipboard, text, hold);
        });

        done_rx
            .await
            .map_err(|_| crate::Error::Clipboard("clipboard task ended early".to_string()))?
    }
}

#[cfg(all(feature = "clipboard", target_os = "linux"))]
fn serve_until(mut clipboard: arboard::Clipboard, text: String, hold: Duration) {
    use arboard::SetExtLinux;

    let deadline = std::time::Instant::now() + hold;
    if let Err(err) = clipboard.set().wait_until(deadline).text(text) {
        tracing::warn!(error = %err, "Clipboard stopped serving copied text early");
    }
}

// Other platforms keep clipboard contents after the handle is dropped
#[cfg(all(feature = "clipboard", not(target_os = "linux")))]
fn serve_until(_clipboard: arboard::Clipboard, _text: String, _hold: Duration) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClipboard(Mutex<Option<String>>);

    #[async_trait]
    impl ClipboardSink for RecordingClipboard {
        async fn write_text(&self, text: &str) -> Result<()> {
            *self.0.lock().expect("clipboard mutex poisoned") = Some(text.to_string());
            Ok(())
        }
    }

    struct RejectingClipboard;

    #[async_trait]
    impl ClipboardSink for RejectingClipboard {
        async fn write_text(&self, _text: &str) -> Result<()> {
            Err(Error::Clipboard("permission denied".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_sets_clipboard_and_acknowledges() {
        let copier = ClipboardCopier::new(RecordingClipboard::default());
        let mut input = InputState::new(Duration::from_millis(2000));
        input.set_text("https://example.com");

        copier.copy_current_text(&mut input).await;
        assert_eq!(
            copier.clipboard().0.lock().unwrap().as_deref(),
            Some("https://example.com")
        );
        assert!(input.copied());

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(input.copied());
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!input.copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_copy_leaves_flag_down() {
        let copier = ClipboardCopier::new(RejectingClipboard);
        let mut input = InputState::new(Duration::from_millis(2000));
        input.set_text("https://example.com");

        copier.copy_current_text(&mut input).await;
        assert!(!input.copied());
    }

    #[tokio::test]
    async fn test_no_clipboard_reports_unavailable() {
        let result = NoClipboard.write_text("anything").await;
        assert!(matches!(result, Err(Error::ClipboardUnavailable(_))));
    }

    #[cfg(feature = "clipboard")]
    #[test]
    fn test_default_clipboard_holds_for_requested_window() {
        assert_eq!(
            default_clipboard(Duration::from_millis(750)).hold(),
            Duration::from_millis(750)
        );
        assert_eq!(SystemClipboard::default().hold(), Duration::from_secs(2));
    }

    #[cfg(not(feature = "clipboard"))]
    #[tokio::test]
    async fn test_default_clipboard_without_backend_is_unavailable() {
        let result = default_clipboard(Duration::from_secs(1)).write_text("x").await;
        assert!(matches!(result, Err(Error::ClipboardUnavailable(_))));
    }
}
