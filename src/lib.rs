//! SignalQR - instant QR code generator with JPG and PDF export
//!
//! The crate renders a QR code for whatever text the user types and exports
//! it either as a JPEG image or as a single-page A4 PDF. It ships a local web
//! interface and a CLI that share the same session and export pipeline.

pub mod cli;
pub mod core;
pub mod export;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::core::{
    config::AppConfig,
    error::{AppError, AppResult, ExportError, RenderError},
    models::{ExportArtifact, ExportFormat, SessionView},
    session::QrSession,
};

pub use export::{
    document::{DocumentCapability, PageConfig, Placement},
    ExportPipeline, ExportReport, ExportStage,
};

pub use utils::qrcode::{QrCodeRenderer, QrSurface, RenderOptions, SurfaceRenderer};

pub use web::{routes::create_routes, server::WebServer, state::AppState};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
