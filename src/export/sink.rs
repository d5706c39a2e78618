use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::error::ExportError;
use crate::core::models::{DeliveryReceipt, ExportArtifact};
use crate::utils::file::write_unique;

/// Final hop of an export: hands the artifact to whoever asked for it.
pub trait ArtifactSink {
    fn deliver(&mut self, artifact: ExportArtifact) -> Result<DeliveryReceipt, ExportError>;
}

/// Holds the artifact so a caller can stream it out, e.g. as an HTTP attachment.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifact: Option<ExportArtifact>,
}

impl MemorySink {
    pub fn take(&mut self) -> Option<ExportArtifact> {
        self.artifact.take()
    }
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, artifact: ExportArtifact) -> Result<DeliveryReceipt, ExportError> {
        let receipt = DeliveryReceipt {
            filename: artifact.filename.clone(),
            mime_type: artifact.mime_type.to_string(),
            size: artifact.bytes.len() as u64,
            size_human: artifact.size_human(),
            path: None,
        };
        self.artifact = Some(artifact);
        Ok(receipt)
    }
}

/// Writes artifacts into a directory without overwriting anything.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, artifact: ExportArtifact) -> Result<DeliveryReceipt, ExportError> {
        let (path, filename) = write_unique(
            &self.directory,
            artifact.format,
            artifact.timestamp_millis,
            &artifact.bytes,
        )
        .map_err(|source| ExportError::Delivery {
            filename: artifact.filename.clone(),
            source,
        })?;

        info!("Saved {:?}", path);

        Ok(DeliveryReceipt {
            filename,
            mime_type: artifact.mime_type.to_string(),
            size: artifact.bytes.len() as u64,
            size_human: artifact.size_human(),
            path: Some(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ExportFormat;
    use tempfile::TempDir;

    #[test]
    fn test_memory_sink_keeps_artifact() {
        let mut sink = MemorySink::default();
        let receipt = sink
            .deliver(ExportArtifact::new(ExportFormat::Jpg, vec![0; 2048]))
            .unwrap();

        assert_eq!(receipt.size, 2048);
        assert!(receipt.size_human.ends_with("KiB"));
        assert!(receipt.path.is_none());
        assert_eq!(sink.take().unwrap().filename, receipt.filename);
        assert!(sink.take().is_none());
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path());

        let receipt = sink
            .deliver(ExportArtifact::new(ExportFormat::Pdf, b"%PDF-1.3".to_vec()))
            .unwrap();

        let path = receipt.path.unwrap();
        assert_eq!(path.parent().unwrap(), temp_dir.path());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3");
    }

    #[test]
    fn test_directory_sink_reports_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path().join("missing"));

        let err = sink
            .deliver(ExportArtifact::new(ExportFormat::Jpg, vec![1]))
            .unwrap_err();
        assert!(matches!(err, ExportError::Delivery { .. }));
    }
}
