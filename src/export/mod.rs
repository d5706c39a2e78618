pub mod document;
pub mod sink;

use tracing::{debug, error, info};

use crate::core::error::ExportError;
use crate::core::models::{DeliveryReceipt, ExportArtifact, ExportFormat};
use crate::utils::qrcode::{QrSurface, RasterFormat};
use document::{placement, DocumentCapability, PageConfig, PAGE_MARGIN_PT};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    Capturing,
    Encoding,
    Delivering,
    Failed,
}

/// Result of one export invocation plus the stages it went through.
#[derive(Debug)]
pub struct ExportReport {
    pub format: ExportFormat,
    pub stages: Vec<ExportStage>,
    pub outcome: Result<DeliveryReceipt, ExportError>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Text for the user when the export failed.
    pub fn notice(&self) -> Option<String> {
        self.outcome.as_ref().err().map(ExportError::user_notice)
    }

    pub fn into_result(self) -> Result<DeliveryReceipt, ExportError> {
        self.outcome
    }
}

struct StageTrail {
    format: ExportFormat,
    stages: Vec<ExportStage>,
}

impl StageTrail {
    fn new(format: ExportFormat) -> Self {
        Self { format, stages: vec![ExportStage::Idle] }
    }

    fn advance(&mut self, stage: ExportStage) {
        debug!(format = %self.format, "Export stage {:?}", stage);
        self.stages.push(stage);
    }
}

/// Captured QR surface -> encoded artifact -> delivered file.
#[derive(Debug, Clone)]
pub struct ExportPipeline {
    jpeg_quality: u8,
    documents: DocumentCapability,
}

impl ExportPipeline {
    pub fn new(jpeg_quality: u8, documents: DocumentCapability) -> Self {
        Self { jpeg_quality, documents }
    }

    pub fn documents(&self) -> &DocumentCapability {
        &self.documents
    }

    pub fn export(
        &self,
        format: ExportFormat,
        surface: Option<&QrSurface>,
        sink: &mut dyn ArtifactSink,
    ) -> ExportReport {
        let mut trail = StageTrail::new(format);
        let outcome = self.run(format, surface, sink, &mut trail);

        match &outcome {
            Ok(receipt) => info!(
                "Exported {} ({}, {})",
                receipt.filename, receipt.mime_type, receipt.size_human
            ),
            Err(e) => {
                error!(format = %format, "Export failed: {}", e);
                trail.advance(ExportStage::Failed);
            }
        }
        trail.advance(ExportStage::Idle);

        ExportReport {
            format,
            stages: trail.stages,
            outcome,
        }
    }

    pub fn export_image(&self, surface: Option<&QrSurface>, sink: &mut dyn ArtifactSink) -> ExportReport {
        self.export(ExportFormat::Jpg, surface, sink)
    }

    pub fn export_document(&self, surface: Option<&QrSurface>, sink: &mut dyn ArtifactSink) -> ExportReport {
        self.export(ExportFormat::Pdf, surface, sink)
    }

    fn run(
        &self,
        format: ExportFormat,
        surface: Option<&QrSurface>,
        sink: &mut dyn ArtifactSink,
        trail: &mut StageTrail,
    ) -> Result<DeliveryReceipt, ExportError> {
        trail.advance(ExportStage::Capturing);
        let surface = surface.ok_or(ExportError::NoSurface)?;

        let bytes = match format {
            ExportFormat::Jpg => {
                trail.advance(ExportStage::Encoding);
                self.encode_image(surface)?
            }
            ExportFormat::Pdf => {
                let backend = self.documents.acquire()?;
                trail.advance(ExportStage::Encoding);
                let mut doc = backend.new_document(&PageConfig::a4_portrait("QR Code"))?;
                let png = encode(surface, RasterFormat::Png)?;
                let spot = placement(doc.page_size(), PAGE_MARGIN_PT);
                debug!(x = spot.x, y = spot.y, size = spot.size, "Placing QR image on page");
                doc.add_image(&png, spot)?;
                doc.finish()?
            }
        };

        trail.advance(ExportStage::Delivering);
        sink.deliver(ExportArtifact::new(format, bytes))
    }

    fn encode_image(&self, surface: &QrSurface) -> Result<Vec<u8>, ExportError> {
        encode(surface, RasterFormat::Jpeg { quality: self.jpeg_quality })
    }
}

fn encode(surface: &QrSurface, format: RasterFormat) -> Result<Vec<u8>, ExportError> {
    surface.encode(format).map_err(|source| ExportError::Serialization {
        format: format.name(),
        source,
    })
}
