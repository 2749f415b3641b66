//! linkqr - turn a link into a QR code image via a hosted rendering service
//!
//! The QR image itself is produced by an external HTTP API. This crate owns the
//! small lifecycle around it: the text being edited, the request URL built from
//! it, a cosmetic busy flag, copying the text to the clipboard, and saving the
//! rendered image locally.
//!
//! # Features
//!
//! - **Speculative references**: generation builds the image URL immediately
//!   and stores it without waiting on the service
//! - **Export**: re-fetch the image as bytes and save it as `qrcode.png`
//! - **Clipboard**: copy the typed text with a short-lived acknowledgement
//! - **Verification**: optionally confirm a reference really yields an image
//!
//! # Example
//!
//! ```no_run
//! use linkqr::{LinkqrConfig, SystemForm};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut form = SystemForm::from_config(&LinkqrConfig::default())?;
//!
//!     form.set_text("https://example.com");
//!     if let Some(reference) = form.submit() {
//!         println!("QR image: {reference}");
//!     }
//!
//!     form.download().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod qr;
pub mod state;

// Re-exports for convenience
pub use error::{Error, Result};

#[cfg(feature = "clipboard")]
#[cfg_attr(docsrs, doc(cfg(feature = "clipboard")))]
pub use clipboard::SystemClipboard;

pub use clipboard::{ClipboardCopier, ClipboardSink, DefaultClipboard, NoClipboard, default_clipboard};
pub use config::{ExportOptions, LinkqrConfig, LogRotation, LoggingOptions, ServiceOptions};
pub use controller::GenerationController;
pub use export::{ArtifactExporter, ArtifactSink, FileSink};
pub use fetch::{ArtifactFetcher, HttpFetcher};
pub use qr::{ArtifactInfo, ArtifactVerifier, Dimensions, HexColor, QrReference, RenderParams};
pub use state::{FormSnapshot, InputState, TimedFlag};

use std::path::PathBuf;

/// Form wired to HTTP, the local filesystem and the system clipboard
pub type SystemForm = QrForm<HttpFetcher, FileSink, DefaultClipboard>;

/// The whole link-to-QR form: input, generation, export and clipboard
pub struct QrForm<F, S, C> {
    input: InputState,
    controller: GenerationController,
    exporter: ArtifactExporter<F, S>,
    copier: ClipboardCopier<C>,
}

impl SystemForm {
    /// Build a form from configuration using the default collaborators.
    ///
    /// Copied text is served for as long as the copy acknowledgement lasts.
    pub fn from_config(config: &LinkqrConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new();
        let sink = FileSink::new(config.export.output_dir.clone());
        Self::new(
            config,
            ArtifactExporter::with_file_name(fetcher, sink, config.export.file_name.clone()),
            ClipboardCopier::new(default_clipboard(config.service.copy_ack_window())),
        )
    }
}

impl<F, S, C> QrForm<F, S, C>
where
    F: ArtifactFetcher,
    S: ArtifactSink,
    C: ClipboardSink,
{
    /// Assemble a form from configuration and explicit collaborators.
    ///
    /// Fails with [`Error::Config`] when the configured endpoint is not an http(s) URL.
    pub fn new(
        config: &LinkqrConfig,
        exporter: ArtifactExporter<F, S>,
        copier: ClipboardCopier<C>,
    ) -> Result<Self> {
        let service = &config.service;
        Ok(Self {
            input: InputState::new(service.copy_ack_window()),
            controller: GenerationController::new(
                service.endpoint_url()?,
                service.render_params(),
                service.busy_window(),
            ),
            exporter,
            copier,
        })
    }

    /// Replace the input text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input.set_text(text);
    }

    /// Current input text
    pub fn text(&self) -> &str {
        self.input.text()
    }

    /// Whether submitting would do anything right now
    pub fn can_submit(&self) -> bool {
        !self.input.is_blank() && !self.controller.is_busy()
    }

    /// Generate a reference from the current text. Blank input is ignored.
    pub fn submit(&mut self) -> Option<QrReference> {
        self.controller.generate(self.input.text())
    }

    /// Generate a reference from arbitrary text
    pub fn generate(&mut self, text: &str) -> Option<QrReference> {
        self.controller.generate(text)
    }

    /// Most recent reference
    pub fn reference(&self) -> Option<&QrReference> {
        self.controller.reference()
    }

    /// Generation busy flag
    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// Copy acknowledgement flag
    pub fn copied(&self) -> bool {
        self.input.copied()
    }

    /// Download the current reference. Errors are logged only.
    pub async fn download(&self) {
        self.exporter.download(self.controller.reference()).await;
    }

    /// Download the current reference, surfacing failures
    pub async fn try_download(&self) -> Result<PathBuf> {
        let reference = self
            .controller
            .reference()
            .ok_or_else(|| Error::Export("nothing has been generated yet".to_string()))?;
        self.exporter.try_download(reference).await
    }

    /// Fetch the current reference and confirm the service returned an image
    pub async fn verify(&self) -> Result<ArtifactInfo> {
        let reference = self
            .controller
            .reference()
            .ok_or_else(|| Error::InvalidReference("nothing has been generated yet".to_string()))?;
        ArtifactVerifier::new(self.exporter.fetcher())
            .verify(reference)
            .await
    }

    /// Copy the current input text. Errors are logged only.
    pub async fn copy_current_text(&mut self) {
        self.copier.copy_current_text(&mut self.input).await;
    }

    /// Wait for the busy flag to drop
    pub async fn busy_cleared(&self) {
        self.controller.busy_flag().cleared().await;
    }

    /// Wait for the copy acknowledgement to drop
    pub async fn copy_cleared(&self) {
        self.input.copy_flag().cleared().await;
    }

    /// Generation controller
    pub fn controller(&self) -> &GenerationController {
        &self.controller
    }

    /// Artifact exporter
    pub fn exporter(&self) -> &ArtifactExporter<F, S> {
        &self.exporter
    }

    /// Clipboard copier
    pub fn copier(&self) -> &ClipboardCopier<C> {
        &self.copier
    }

    /// Point-in-time view of the form
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            text: self.input.text().to_string(),
            reference: self.controller.reference().map(|r| r.as_str().to_string()),
            busy: self.controller.is_busy(),
            copied: self.input.copied(),
        }
    }
}
