use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::core::app::App;
use crate::core::config::AppConfig;
use crate::core::error::{AppError, AppResult};
use crate::core::models::{DeliveryReceipt, ExportFormat};
use crate::core::session::QrSession;
use crate::export::document::DocumentCapability;
use crate::export::{DirectorySink, ExportPipeline};
use crate::utils::file::resolve_output_dir;
use crate::utils::qrcode::{render_terminal, RenderOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Port to listen on (will find next available port if this one is in use)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind the web interface to
    #[arg(long)]
    host: Option<String>,

    /// Disable QR code display in the terminal
    #[arg(long)]
    no_qr: bool,

    /// Open web browser automatically
    #[arg(short, long)]
    open: bool,

    /// Generate example configuration file
    #[arg(long)]
    generate_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export a QR code for TEXT without starting the web interface
    Export {
        /// Text or URL to encode
        #[arg(short, long)]
        text: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Jpg)]
        format: ExportFormat,

        /// Directory to write the file into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a QR code for TEXT to the terminal
    Show {
        /// Text or URL to encode
        #[arg(short, long)]
        text: String,
    },
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        if self.generate_config {
            AppConfig::save_example()?;
            println!("Generated example configuration file: signalqr.example.toml");
            return Ok(());
        }

        let mut config = AppConfig::load().unwrap_or_else(|e| {
            info!("Using default configuration ({})", e);
            AppConfig::default()
        });

        // Override config with CLI arguments
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if self.no_qr {
            config.ui.terminal_qr = false;
        }
        if self.open {
            config.ui.open_browser = true;
        }

        match &self.command {
            Some(Command::Export { text, format, out }) => {
                let receipt = export_once(&config, text, *format, out.as_deref())?;
                match receipt.path {
                    Some(path) => println!("{}", path.display()),
                    None => println!("{}", receipt.filename),
                }
                Ok(())
            }
            Some(Command::Show { text }) => {
                let qr = render_terminal(text).context("failed to render QR code")?;
                println!("{}", qr);
                Ok(())
            }
            None => App::new(config, DocumentCapability::detect()).run().await,
        }
    }
}

fn export_once(
    config: &AppConfig,
    text: &str,
    format: ExportFormat,
    out: Option<&std::path::Path>,
) -> AppResult<DeliveryReceipt> {
    let mut session = QrSession::new(RenderOptions {
        size: config.render.size,
        include_margin: config.render.include_margin,
    });
    session.set_text(text);
    if let Some(notice) = session.notice() {
        return Err(AppError::Input(notice.to_string()));
    }

    let directory = resolve_output_dir(out, config.export.output_dir.as_deref())?;
    let pipeline = ExportPipeline::new(config.export.jpeg_encoder_quality(), DocumentCapability::detect());
    let mut sink = DirectorySink::new(directory);

    let surface = session.surface().cloned();
    let report = pipeline.export(format, surface.as_deref(), &mut sink);
    if let Some(notice) = report.notice() {
        eprintln!("{}", notice);
    }
    Ok(report.into_result()?)
}
