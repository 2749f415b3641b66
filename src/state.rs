//! Form state: the input text and the self-clearing UI flags

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// A boolean that switches itself back off after a fixed window.
///
/// The flag stores a deadline rather than scheduling a callback, so there is
/// nothing left to fire once the owner is gone. Raising it again while it is
/// still up restarts the window.
#[derive(Debug, Clone)]
pub struct TimedFlag {
    window: Duration,
    until: Option<Instant>,
}

impl TimedFlag {
    /// A lowered flag that stays up for `window` each time it is raised
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: None,
        }
    }

    /// Configured auto-reset window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Raise the flag, restarting the window
    pub fn raise(&mut self) {
        self.until = Some(Instant::now() + self.window);
    }

    /// Whether the flag is currently up
    pub fn is_set(&self) -> bool {
        self.until.is_some_and(|until| Instant::now() < until)
    }

    /// Wait until the flag has auto-reset. Returns immediately if it is down.
    pub async fn cleared(&self) {
        if let Some(until) = self.until {
            tokio::time::sleep_until(until).await;
        }
    }
}

/// Text being edited plus the copy acknowledgement shown after a clipboard write
#[derive(Debug, Clone)]
pub struct InputState {
    text: String,
    copied: TimedFlag,
}

impl InputState {
    /// Empty input whose copy acknowledgement lasts `copy_ack`
    pub fn new(copy_ack: Duration) -> Self {
        Self {
            text: String::new(),
            copied: TimedFlag::new(copy_ack),
        }
    }

    /// Current text, exactly as typed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. No validation happens here.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// True when the text is empty once surrounding whitespace is ignored
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether a copy was acknowledged recently
    pub fn copied(&self) -> bool {
        self.copied.is_set()
    }

    /// The copy acknowledgement flag
    pub fn copy_flag(&self) -> &TimedFlag {
        &self.copied
    }

    pub(crate) fn acknowledge_copy(&mut self) {
        self.copied.raise();
    }
}

/// Point-in-time view of the whole form, suitable for rendering or JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    /// Current input text
    pub text: String,
    /// Most recent reference, if any generation happened
    pub reference: Option<String>,
    /// Generation busy flag
    pub busy: bool,
    /// Copy acknowledgement flag
    pub copied: bool,
}
