use anyhow::Result;
use std::future::Future;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use crate::core::config::AppConfig;
use crate::export::document::DocumentCapability;
use crate::utils::network::{parse_host, pick_port, ui_url};
use crate::utils::qrcode::generate_url_banner;
use crate::web::server::WebServer;
use crate::web::state::AppState;

pub struct App {
    config: AppConfig,
    documents: DocumentCapability,
}

impl App {
    pub fn new(config: AppConfig, documents: DocumentCapability) -> Self {
        Self { config, documents }
    }

    pub async fn run(&self) -> Result<()> {
        let host = parse_host(&self.config.server.host);
        let port = pick_port(host, self.config.server.port);
        let url = ui_url(host, port);

        match &self.documents {
            DocumentCapability::Available(backend) => {
                info!("PDF export enabled ({})", backend.name())
            }
            DocumentCapability::Missing(reason) => warn!("PDF export disabled: {}", reason),
        }
        info!("SignalQR available at: {}", url);

        if self.config.ui.terminal_qr {
            match generate_url_banner(&url) {
                Ok(banner) => println!("{}", banner),
                Err(e) => error!("Failed to generate QR code: {}", e),
            }
        }

        if self.config.ui.open_browser {
            if let Err(e) = open::that(&url) {
                error!("Failed to open browser: {}", e);
            }
        }

        let state = AppState::from_config(&self.config, self.documents.clone());
        let server = WebServer::new(SocketAddr::new(host, port), state);

        let shutdown_signal = wait_for_shutdown(signal::ctrl_c());

        if let Err(e) = server.run(shutdown_signal).await {
            error!("Server error: {}", e);
            return Err(e.into());
        }

        info!("Shutdown complete");
        Ok(())
    }
}

/// Resolves once `signal` fires. A signal that cannot be listened for never resolves.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down gracefully...");
}
