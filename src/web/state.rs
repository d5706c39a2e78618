use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::config::AppConfig;
use crate::core::session::QrSession;
use crate::export::document::DocumentCapability;
use crate::export::ExportPipeline;
use crate::utils::qrcode::RenderOptions;

/// Shared between handlers. One session per server process.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<QrSession>>,
    pub pipeline: Arc<ExportPipeline>,
}

impl AppState {
    pub fn new(session: QrSession, pipeline: ExportPipeline) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn from_config(config: &AppConfig, documents: DocumentCapability) -> Self {
        let options = RenderOptions {
            size: config.render.size,
            include_margin: config.render.include_margin,
        };
        let pipeline = ExportPipeline::new(config.export.jpeg_encoder_quality(), documents);
        Self::new(QrSession::new(options), pipeline)
    }
}
