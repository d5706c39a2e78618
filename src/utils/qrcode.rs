use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageBuffer, ImageEncoder, ImageResult, Rgb, RgbImage};
use qrcode::render::unicode;
use qrcode::{Color, QrCode};

use crate::core::error::RenderError;

/// Light modules around the symbol when a margin is requested.
pub const QUIET_ZONE_MODULES: u32 = 4;

const DARK: Rgb<u8> = Rgb([0, 0, 0]);
const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub size: u32,
    pub include_margin: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { size: 220, include_margin: true }
    }
}

/// Turns text into a drawable QR bitmap.
pub trait SurfaceRenderer: Send + Sync {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<RgbImage, RenderError>;
}

/// Renderer backed by the `qrcode` crate.
#[derive(Debug, Clone, Default)]
pub struct QrCodeRenderer;

impl SurfaceRenderer for QrCodeRenderer {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<RgbImage, RenderError> {
        let code = QrCode::new(text.as_bytes())?;
        let modules = code.width() as u32;
        let colors = code.to_colors();

        let border = if options.include_margin { QUIET_ZONE_MODULES } else { 0 };
        let cells = modules + 2 * border;
        let scale = (options.size / cells).max(1);
        let side = (cells * scale).max(options.size);
        // Leftover pixels are split evenly so the symbol stays centered
        let offset = (side - cells * scale) / 2 + border * scale;

        let mut img: RgbImage = ImageBuffer::from_pixel(side, side, LIGHT);
        for y in 0..modules {
            for x in 0..modules {
                if colors[(y * modules + x) as usize] != Color::Dark {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(offset + x * scale + dx, offset + y * scale + dy, DARK);
                    }
                }
            }
        }

        Ok(img)
    }
}

/// Raster encodings a surface can serialize itself to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg { quality: u8 },
    Png,
}

impl RasterFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg { .. } => "image/jpeg",
            RasterFormat::Png => "image/png",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg { .. } => "jpg",
            RasterFormat::Png => "png",
        }
    }
}

/// A rendered QR bitmap together with the text and session revision it belongs to.
#[derive(Debug, Clone)]
pub struct QrSurface {
    text: String,
    revision: u64,
    image: RgbImage,
}

impl QrSurface {
    pub fn new(text: impl Into<String>, revision: u64, image: RgbImage) -> Self {
        Self { text: text.into(), revision, image }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn encode(&self, format: RasterFormat) -> ImageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let (w, h) = self.image.dimensions();
        match format {
            RasterFormat::Jpeg { quality } => {
                JpegEncoder::new_with_quality(&mut bytes, quality)
                    .write_image(self.image.as_raw(), w, h, ColorType::Rgb8)?;
            }
            RasterFormat::Png => {
                PngEncoder::new(&mut bytes).write_image(self.image.as_raw(), w, h, ColorType::Rgb8)?;
            }
        }
        Ok(bytes)
    }

    pub fn to_data_url(&self, format: RasterFormat) -> ImageResult<String> {
        let bytes = self.encode(format)?;
        Ok(format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes)))
    }
}

/// Half-block rendering for terminals.
pub fn render_terminal(text: &str) -> Result<String> {
    let code = QrCode::new(text.as_bytes())?;
    let qr = code.render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build();

    Ok(qr)
}

/// Banner printed on startup so a phone can open the page.
pub fn generate_url_banner(url: &str) -> Result<String> {
    let qr = render_terminal(url)?;

    let mut output = String::new();
    output.push('\n');
    output.push_str("Scan this QR code to open SignalQR:\n");
    output.push_str(&qr);
    output.push('\n');
    output.push_str(&format!("Or open: {}\n", url));

    Ok(output)
}
