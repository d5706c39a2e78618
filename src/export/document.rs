use std::sync::Arc;

use crate::core::error::ExportError;

/// A4 in PostScript points.
pub const A4_PORTRAIT_PT: (f32, f32) = (595.28, 841.89);
/// Half an inch.
pub const PAGE_MARGIN_PT: f32 = 36.0;
/// Largest edge the QR image may take on the page.
pub const MAX_IMAGE_PT: f32 = 360.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub title: String,
    /// Width and height in points
    pub format: (f32, f32),
}

impl PageConfig {
    pub fn a4_portrait(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            format: A4_PORTRAIT_PT,
        }
    }

    pub fn size(&self) -> PageSize {
        let (width, height) = self.format;
        PageSize { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

/// Square image position in page points, origin at a page corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Largest square that fits inside the margins, capped at [`MAX_IMAGE_PT`], centered on the page.
pub fn placement(page: PageSize, margin: f32) -> Placement {
    let max_w = page.width - margin * 2.0;
    let max_h = page.height - margin * 2.0;
    let size = max_w.min(max_h).min(MAX_IMAGE_PT).max(0.0);

    Placement {
        x: (page.width - size) / 2.0,
        y: (page.height - size) / 2.0,
        size,
    }
}

pub trait DocumentBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn new_document(&self, page: &PageConfig) -> Result<Box<dyn DocumentWriter>, ExportError>;
}

pub trait DocumentWriter {
    fn page_size(&self) -> PageSize;

    /// Embeds a PNG-encoded image at `placement`.
    fn add_image(&mut self, png: &[u8], placement: Placement) -> Result<(), ExportError>;

    fn finish(self: Box<Self>) -> Result<Vec<u8>, ExportError>;
}

/// Optional document-construction capability, resolved once at startup.
/// Builds without the `pdf` feature carry `Missing`, and PDF exports then
/// fail with a notice.
#[derive(Clone)]
pub enum DocumentCapability {
    Available(Arc<dyn DocumentBackend>),
    Missing(String),
}

impl DocumentCapability {
    /// Picks whatever backend this build was compiled with.
    pub fn detect() -> Self {
        #[cfg(feature = "pdf")]
        {
            DocumentCapability::Available(Arc::new(printpdf_backend::PrintPdfBackend))
        }
        #[cfg(not(feature = "pdf"))]
        {
            DocumentCapability::Missing("built without the `pdf` feature".to_string())
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DocumentCapability::Available(_))
    }

    pub fn acquire(&self) -> Result<Arc<dyn DocumentBackend>, ExportError> {
        match self {
            DocumentCapability::Available(backend) => Ok(backend.clone()),
            DocumentCapability::Missing(reason) => {
                Err(ExportError::CapabilityUnavailable(reason.clone()))
            }
        }
    }
}

impl std::fmt::Debug for DocumentCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentCapability::Available(backend) => {
                f.debug_tuple("Available").field(&backend.name()).finish()
            }
            DocumentCapability::Missing(reason) => f.debug_tuple("Missing").field(reason).finish(),
        }
    }
}

#[cfg(feature = "pdf")]
pub mod printpdf_backend {
    use std::io::Cursor;

    use printpdf::image_crate::codecs::png::PngDecoder;
    use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Pt};

    use super::{DocumentBackend, DocumentWriter, PageConfig, PageSize, Placement};
    use crate::core::error::ExportError;

    /// Image DPI at which one pixel is one point.
    const POINT_DPI: f32 = 72.0;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct PrintPdfBackend;

    impl DocumentBackend for PrintPdfBackend {
        fn name(&self) -> &'static str {
            "printpdf"
        }

        fn new_document(&self, page: &PageConfig) -> Result<Box<dyn DocumentWriter>, ExportError> {
            let size = page.size();
            let (doc, page_index, layer_index) = PdfDocument::new(
                page.title.as_str(),
                Mm::from(Pt(size.width)),
                Mm::from(Pt(size.height)),
                "QR",
            );
            let layer = doc.get_page(page_index).get_layer(layer_index);

            Ok(Box::new(PrintPdfWriter { doc, layer, size }))
        }
    }

    pub struct PrintPdfWriter {
        doc: PdfDocumentReference,
        layer: PdfLayerReference,
        size: PageSize,
    }

    impl DocumentWriter for PrintPdfWriter {
        fn page_size(&self) -> PageSize {
            self.size
        }

        fn add_image(&mut self, png: &[u8], placement: Placement) -> Result<(), ExportError> {
            let decoder = PngDecoder::new(Cursor::new(png))
                .map_err(|e| ExportError::Embedding(format!("invalid PNG data: {}", e)))?;
            let image = Image::try_from(decoder)
                .map_err(|e| ExportError::Embedding(format!("unsupported image: {}", e)))?;

            let px_w = image.image.width.0 as f32;
            let px_h = image.image.height.0 as f32;
            if px_w == 0.0 || px_h == 0.0 {
                return Err(ExportError::Embedding("image has no pixels".to_string()));
            }

            image.add_to_layer(
                self.layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm::from(Pt(placement.x))),
                    translate_y: Some(Mm::from(Pt(placement.y))),
                    scale_x: Some(placement.size / px_w),
                    scale_y: Some(placement.size / px_h),
                    dpi: Some(POINT_DPI),
                    ..Default::default()
                },
            );
            Ok(())
        }

        fn finish(self: Box<Self>) -> Result<Vec<u8>, ExportError> {
            self.doc
                .save_to_bytes()
                .map_err(|e| ExportError::Embedding(format!("failed to write PDF: {}", e)))
        }
    }
}
