use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("text does not fit in a QR code: {0}")]
    DataTooLong(qrcode::types::QrError),

    #[error("QR encoding failed: {0}")]
    Encoding(qrcode::types::QrError),
}

impl From<qrcode::types::QrError> for RenderError {
    fn from(err: qrcode::types::QrError) -> Self {
        match err {
            qrcode::types::QrError::DataTooLong => RenderError::DataTooLong(err),
            other => RenderError::Encoding(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export: enter some text first")]
    NoSurface,

    #[error("QR code changed since revision {requested} (now {current})")]
    StaleSurface { requested: u64, current: u64 },

    #[error("could not encode QR image as {format}: {source}")]
    Serialization {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("document export is unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("could not place QR image into the document: {0}")]
    Embedding(String),

    #[error("could not deliver {filename}: {source}")]
    Delivery {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Message suitable for showing to the person who clicked the button.
    pub fn user_notice(&self) -> String {
        match self {
            ExportError::NoSurface => "Type something first, then export.".to_string(),
            ExportError::StaleSurface { .. } => {
                "The QR code changed while exporting. Please try again.".to_string()
            }
            ExportError::Serialization { format, .. } => {
                format!("Could not export {}. Try again with shorter text.", format.to_uppercase())
            }
            ExportError::CapabilityUnavailable(_) => {
                "PDF export requires the 'pdf' feature. Rebuild with: cargo install signalqr --features pdf\nThen try again.".to_string()
            }
            ExportError::Embedding(_) => "Could not build the PDF. Please try again.".to_string(),
            ExportError::Delivery { filename, .. } => format!("Could not save {}.", filename),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Server error: {0}")]
    Server(String),
}

pub type AppResult<T> = Result<T, AppError>;
