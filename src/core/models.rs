use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Downloadable artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Raster JPEG image
    #[value(alias = "jpeg")]
    Jpg,
    /// Single-page A4 document
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jpg => "jpg",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Jpg => "image/jpeg",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ExportFormat::Jpg),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unsupported export format: {}", other)),
        }
    }
}

/// `qr-<unix-millis>.<ext>`
pub fn artifact_filename(format: ExportFormat, timestamp_millis: i64) -> String {
    format!("qr-{}.{}", timestamp_millis, format.extension())
}

/// File payload produced by one export invocation. Never stored in session state.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    /// Timestamp token the filename was derived from
    pub timestamp_millis: i64,
    pub format: ExportFormat,
}

impl ExportArtifact {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        let timestamp_millis = chrono::Utc::now().timestamp_millis();
        Self {
            filename: artifact_filename(format, timestamp_millis),
            mime_type: format.mime_type(),
            bytes,
            timestamp_millis,
            format,
        }
    }

    pub fn size_human(&self) -> String {
        humansize::format_size(self.bytes.len() as u64, humansize::BINARY)
    }
}

/// What a sink reports back once an artifact has been handed over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryReceipt {
    pub filename: String,
    pub mime_type: String,
    pub size: u64,
    pub size_human: String,
    /// Set when the artifact was written to disk
    pub path: Option<PathBuf>,
}

/// Snapshot of the session sent to the web page after every change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionView {
    pub text: String,
    pub about_visible: bool,
    pub exports_enabled: bool,
    pub placeholder: bool,
    pub revision: u64,
    pub qr_data_url: Option<String>,
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("jpg", ExportFormat::Jpg)]
    #[case("JPEG", ExportFormat::Jpg)]
    #[case("pdf", ExportFormat::Pdf)]
    #[case("Pdf", ExportFormat::Pdf)]
    fn test_format_parsing(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!("png".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Jpg.extension(), "jpg");
        assert_eq!(ExportFormat::Jpg.mime_type(), "image/jpeg");
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(ExportFormat::Pdf.to_string(), "pdf");
    }

    #[test]
    fn test_artifact_filename() {
        assert_eq!(artifact_filename(ExportFormat::Jpg, 1700000000123), "qr-1700000000123.jpg");
        assert_eq!(artifact_filename(ExportFormat::Pdf, 42), "qr-42.pdf");
    }

    #[test]
    fn test_artifact_uses_current_timestamp() {
        let before = chrono::Utc::now().timestamp_millis();
        let artifact = ExportArtifact::new(ExportFormat::Pdf, vec![1, 2, 3]);
        let after = chrono::Utc::now().timestamp_millis();

        assert!(artifact.timestamp_millis >= before && artifact.timestamp_millis <= after);
        assert_eq!(artifact.filename, format!("qr-{}.pdf", artifact.timestamp_millis));
        assert_eq!(artifact.mime_type, "application/pdf");
        assert_eq!(artifact.size_human(), "3 B");
    }

    #[test]
    fn test_session_view_serialization() {
        let view = SessionView {
            text: "hello".to_string(),
            about_visible: false,
            exports_enabled: true,
            placeholder: false,
            revision: 3,
            qr_data_url: Some("data:image/png;base64,AAAA".to_string()),
            notice: None,
        };

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"exports_enabled\":true"));

        let back: SessionView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }
}
