//! Handles settings for the server process.
//!
//! Values come from an optional `settings.toml` in the working directory,
//! then from `SPENDLOG__*` environment variables (`SPENDLOG__SERVER__PORT`
//! overrides `server.port`).
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite:./spendlog.db?mode=rwc";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database_url: String,
}

impl Server {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.database_url", DEFAULT_DATABASE_URL)?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("SPENDLOG").separator("__"))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        if settings.server.database_url.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "server.database_url must not be empty".to_string(),
            ));
        }
        Ok(settings)
    }
}
