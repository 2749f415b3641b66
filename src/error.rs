//! Error types for linkqr operations

use thiserror::Error;

/// Result type alias using linkqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for linkqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input text was empty or whitespace-only
    #[error("Nothing to encode: input text is empty")]
    EmptyInput,

    /// Fetching or saving a generated artifact failed
    #[error("Export failed: {0}")]
    Export(String),

    /// HTTP transport or status error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Clipboard rejected the write
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// No clipboard backend compiled in or reachable
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    /// Downloaded bytes are not a readable image
    #[error("Image processing error: {0}")]
    Image(String),

    /// A reference URL could not be interpreted
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

#[cfg(feature = "clipboard")]
impl From<arboard::Error> for Error {
    fn from(e: arboard::Error) -> Self {
        match e {
            arboard::Error::ClipboardNotSupported => Error::ClipboardUnavailable(e.to_string()),
            other => Error::Clipboard(other.to_string()),
        }
    }
}
