//! Opt-in confirmation that a reference really yields an image

use crate::error::{Error, Result};
use crate::fetch::ArtifactFetcher;
use crate::qr::QrReference;
use image::ImageFormat;
use serde::Serialize;

/// What the rendering service actually returned for a reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    /// Detected container format (e.g. `png`)
    pub format: String,
    /// Decoded width in pixels
    pub width: u32,
    /// Decoded height in pixels
    pub height: u32,
    /// Body size in bytes
    pub byte_length: usize,
}

/// Fetches a reference and checks the body decodes as an image
pub struct ArtifactVerifier<F> {
    fetcher: F,
}

impl<F: ArtifactFetcher> ArtifactVerifier<F> {
    /// Verifier fetching through `fetcher`
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch and decode the artifact behind `reference`
    pub async fn verify(&self, reference: &QrReference) -> Result<ArtifactInfo> {
        let body = self.fetcher.fetch(reference).await?;
        let format = image::guess_format(&body)
            .map_err(|e| Error::Image(format!("Service did not return an image: {e}")))?;
        let decoded = image::load_from_memory_with_format(&body, format)?;

        let info = ArtifactInfo {
            format: format_label(format),
            width: decoded.width(),
            height: decoded.height(),
            byte_length: body.len(),
        };
        tracing::info!(
            format = %info.format,
            width = info.width,
            height = info.height,
            "Verified generated artifact"
        );
        Ok(info)
    }
}

fn format_label(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|ext| (*ext).to_string())
        .unwrap_or_else(|| format!("{format:?}").to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use image::{ImageBuffer, Luma};
    use std::io::Cursor;

    struct StaticFetcher(Bytes);

    #[async_trait]
    impl ArtifactFetcher for StaticFetcher {
        async fn fetch(&self, _reference: &QrReference) -> Result<Bytes> {
            Ok(self.0.clone())
        }
    }

    fn png(width: u32, height: u32) -> Bytes {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    #[tokio::test]
    async fn test_verify_reports_dimensions() {
        let verifier = ArtifactVerifier::new(StaticFetcher(png(30, 20)));
        let info = verifier
            .verify(&QrReference::new("http://unused/?data=x"))
            .await
            .unwrap();
        assert_eq!(info.format, "png");
        assert_eq!((info.width, info.height), (30, 20));
    }

    #[tokio::test]
    async fn test_verify_rejects_non_image_body() {
        let verifier = ArtifactVerifier::new(StaticFetcher(Bytes::from_static(b"<html>oops</html>")));
        let result = verifier.verify(&QrReference::new("http://unused/?data=x")).await;
        assert!(matches!(result, Err(Error::Image(_))));
    }
}
