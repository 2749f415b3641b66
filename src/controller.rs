//! Generation controller: text in, speculative reference out

use crate::qr::{GenerationRequest, QrReference, RenderParams};
use crate::state::TimedFlag;
use reqwest::Url;
use std::time::Duration;

/// Builds references for the rendering service and tracks a cosmetic busy flag.
///
/// The busy flag follows a fixed window, not the network: it goes up on every
/// accepted `generate` and drops once the window passes, whatever the service
/// ends up doing with the reference.
#[derive(Debug, Clone)]
pub struct GenerationController {
    endpoint: Url,
    params: RenderParams,
    busy: TimedFlag,
    reference: Option<QrReference>,
}

impl GenerationController {
    /// Controller targeting `endpoint` with fixed `params`
    pub fn new(endpoint: Url, params: RenderParams, busy_window: Duration) -> Self {
        Self {
            endpoint,
            params,
            busy: TimedFlag::new(busy_window),
            reference: None,
        }
    }

    /// Store a fresh reference for `text`, or do nothing if it is blank.
    ///
    /// The stored reference replaces any earlier one outright.
    pub fn generate(&mut self, text: &str) -> Option<QrReference> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring generate request with empty input");
            return None;
        }

        self.busy.raise();
        let reference = GenerationRequest::new(&self.endpoint, text, self.params).to_reference();
        tracing::info!(reference = %reference, "Generated QR reference");
        self.reference = Some(reference.clone());
        Some(reference)
    }

    /// Most recent reference
    pub fn reference(&self) -> Option<&QrReference> {
        self.reference.as_ref()
    }

    /// Whether the busy window is still open
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// The busy flag itself, for awaiting its reset
    pub fn busy_flag(&self) -> &TimedFlag {
        &self.busy
    }

    /// Rendering parameters applied to every request
    pub fn params(&self) -> RenderParams {
        self.params
    }

    /// Service endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}
