use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use anyhow::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub render: RenderConfig,
    pub export: ExportConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Edge length of the rendered QR bitmap in pixels
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_true")]
    pub include_margin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// JPEG quality factor in 0.0..=1.0
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: f32,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub terminal_qr: bool,
    #[serde(default = "default_false")]
    pub open_browser: bool,
}

// Default value functions
fn default_port() -> u16 { 8080 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_size() -> u32 { 220 }
fn default_jpeg_quality() -> f32 { 0.95 }
fn default_true() -> bool { true }
fn default_false() -> bool { false }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: default_port(),
                host: default_host(),
            },
            render: RenderConfig {
                size: default_size(),
                include_margin: default_true(),
            },
            export: ExportConfig {
                jpeg_quality: default_jpeg_quality(),
                output_dir: None,
            },
            ui: UiConfig {
                terminal_qr: default_true(),
                open_browser: default_false(),
            },
        }
    }
}

impl ExportConfig {
    /// Quality factor mapped onto the 1..=100 scale the JPEG encoder takes.
    pub fn jpeg_encoder_quality(&self) -> u8 {
        (self.jpeg_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("signalqr.toml").required(false))
            .add_source(config::Environment::with_prefix("SIGNALQR").separator("__"));

        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }

        let settings = builder.build()?;
        let config: AppConfig = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn save_example() -> Result<()> {
        let example_config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&example_config)?;
        std::fs::write("signalqr.example.toml", toml_string)?;
        Ok(())
    }

    pub fn from_toml(toml_content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_content)?;
        Ok(config)
    }
}
