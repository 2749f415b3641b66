//! QR rendering-service requests
//!
//! QR images are produced by a hosted HTTP service. This module only knows how to
//! describe what we want rendered ([`RenderParams`]), turn text into a request
//! URL ([`GenerationRequest`]), and read a stored [`QrReference`] back.

mod params;
mod request;
mod verify;

pub use params::{Dimensions, HexColor, RenderParams};
pub use request::{DEFAULT_ENDPOINT, GenerationRequest, parse_endpoint};
pub use verify::{ArtifactInfo, ArtifactVerifier};

use crate::error::{Error, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// URL of an image produced by the rendering service.
///
/// References are speculative: they are stored as soon as they are built and
/// only prove valid when something actually loads them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QrReference(String);

impl QrReference {
    /// Wrap an already-built reference URL
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The reference as a URL string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the reference as a URL
    pub fn url(&self) -> Result<Url> {
        Url::parse(&self.0).map_err(|e| Error::InvalidReference(format!("{}: {e}", self.0)))
    }

    /// Decoded value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<String> {
        let url = self.url().ok()?;
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Decode the `data` parameter back into the text that was encoded
    pub fn payload(&self) -> Result<String> {
        let url = self.url()?;
        url.query_pairs()
            .find(|(key, _)| key == "data")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| Error::InvalidReference(format!("no data parameter in {}", self.0)))
    }
}

impl fmt::Display for QrReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QrReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
