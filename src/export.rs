//! Artifact exporter: re-fetch a reference as bytes and save it locally

use crate::error::{Error, Result};
use crate::fetch::ArtifactFetcher;
use crate::qr::QrReference;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Filename used for saved artifacts unless configured otherwise
pub const DEFAULT_FILE_NAME: &str = "qrcode.png";

/// Destination for exported artifact bytes
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persist `body` under `file_name`, returning where it landed
    async fn save(&self, file_name: &str, body: Bytes) -> Result<PathBuf>;
}

/// Saves artifacts into a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Sink writing into `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for FileSink {
    async fn save(&self, file_name: &str, body: Bytes) -> Result<PathBuf> {
        if Path::new(file_name).file_name().and_then(|n| n.to_str()) != Some(file_name) {
            return Err(Error::Export(format!(
                "File name '{file_name}' must not contain a path"
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create directory {}: {e}", self.dir.display()),
            ))
        })?;

        // Land the bytes beside the target first so a failed write never
        // leaves a truncated image under the real name.
        let target = self.dir.join(file_name);
        let partial = self.dir.join(format!(".{file_name}.part"));
        if let Err(err) = tokio::fs::write(&partial, &body).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err.into());
        }
        if let Err(err) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err.into());
        }
        Ok(target)
    }
}

/// Downloads the artifact behind a reference and hands it to a sink
pub struct ArtifactExporter<F, S> {
    fetcher: F,
    sink: S,
    file_name: String,
}

impl<F: ArtifactFetcher, S: ArtifactSink> ArtifactExporter<F, S> {
    /// Exporter saving under [`DEFAULT_FILE_NAME`]
    pub fn new(fetcher: F, sink: S) -> Self {
        Self::with_file_name(fetcher, sink, DEFAULT_FILE_NAME)
    }

    /// Exporter saving under a custom filename
    pub fn with_file_name(fetcher: F, sink: S, file_name: impl Into<String>) -> Self {
        Self {
            fetcher,
            sink,
            file_name: file_name.into(),
        }
    }

    /// Fetcher used for every download
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Destination for saved artifacts
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Filename artifacts are saved under
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Fetch `reference` afresh and save it. Failures are logged, never returned.
    pub async fn download(&self, reference: Option<&QrReference>) {
        let Some(reference) = reference else {
            tracing::debug!("No reference to download yet");
            return;
        };

        if let Err(err) = self.try_download(reference).await {
            tracing::error!(error = %err, reference = %reference, "Error downloading QR code");
        }
    }

    /// Fetch `reference` afresh and save it, reporting what went wrong.
    pub async fn try_download(&self, reference: &QrReference) -> Result<PathBuf> {
        let body = self
            .fetcher
            .fetch(reference)
            .await
            .map_err(|e| Error::Export(format!("fetch failed: {e}")))?;
        let byte_length = body.len();

        let path = self
            .sink
            .save(&self.file_name, body)
            .await
            .map_err(|e| Error::Export(format!("save failed: {e}")))?;

        tracing::info!(path = %path.display(), bytes = byte_length, "Saved QR code");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingFetcher;

    #[async_trait]
    impl ArtifactFetcher for FailingFetcher {
        async fn fetch(&self, _reference: &QrReference) -> Result<Bytes> {
            Err(Error::Other("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct CountingFetcher(AtomicUsize);

    #[async_trait]
    impl ArtifactFetcher for CountingFetcher {
        async fn fetch(&self, _reference: &QrReference) -> Result<Bytes> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(b"\x89PNG fake"))
        }
    }

    #[derive(Default)]
    struct MemorySink(Mutex<Vec<(String, Bytes)>>);

    #[async_trait]
    impl ArtifactSink for MemorySink {
        async fn save(&self, file_name: &str, body: Bytes) -> Result<PathBuf> {
            self.0
                .lock()
                .expect("sink mutex poisoned")
                .push((file_name.to_string(), body));
            Ok(PathBuf::from(file_name))
        }
    }

    fn reference() -> QrReference {
        QrReference::new("http://127.0.0.1:9/?data=x")
    }

    #[tokio::test]
    async fn test_download_without_reference_does_nothing() {
        let exporter = ArtifactExporter::new(CountingFetcher::default(), MemorySink::default());
        exporter.download(None).await;
        assert_eq!(exporter.fetcher.0.load(Ordering::SeqCst), 0);
        assert!(exporter.sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_swallows_fetch_failure() {
        let exporter = ArtifactExporter::new(FailingFetcher, MemorySink::default());
        exporter.download(Some(&reference())).await;
        assert!(exporter.sink.0.lock().unwrap().is_empty());

        let err = exporter.try_download(&reference()).await.unwrap_err();
        assert!(matches!(err, Error::Export(_)));
    }

    #[tokio::test]
    async fn test_each_download_fetches_again() {
        let exporter = ArtifactExporter::new(CountingFetcher::default(), MemorySink::default());
        exporter.download(Some(&reference())).await;
        exporter.download(Some(&reference())).await;
        assert_eq!(exporter.fetcher.0.load(Ordering::SeqCst), 2);

        let saved = exporter.sink.0.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].0, DEFAULT_FILE_NAME);
    }

    #[tokio::test]
    async fn test_file_sink_writes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out"));

        let path = sink
            .save("qrcode.png", Bytes::from_static(b"first"))
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("out").join("qrcode.png"));

        sink.save("qrcode.png", Bytes::from_static(b"second"))
            .await
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join("out").join(".qrcode.png.part").exists());
    }

    #[tokio::test]
    async fn test_file_sink_rejects_nested_names() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());
        let result = sink.save("../escape.png", Bytes::new()).await;
        assert!(matches!(result, Err(Error::Export(_))));
    }

    #[tokio::test]
    async fn test_failed_rename_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory squatting on the target name makes the rename fail
        let blocker = dir.path().join("qrcode.png");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let sink = FileSink::new(dir.path());
        let result = sink.save("qrcode.png", Bytes::from_static(b"png")).await;
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!dir.path().join(".qrcode.png.part").exists());
        assert!(blocker.join("keep").exists());
    }
}
