use anyhow::{Context, Result};

use crate::command::template::CommandTemplate;

const DEFAULT_TEMPLATE: &str = "qwen {prompt}";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8001;
const DEFAULT_MODEL_ID: &str = "cli-agent";

/// Process-wide settings, loaded once at startup and shared read-only with
/// every request handler.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub template: CommandTemplate,
    pub host: String,
    pub port: u16,
    /// When set, the exact rendered command is logged before execution.
    pub debug: bool,
    /// Identifier advertised by the models listing.
    pub model_id: String,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self> {
        let raw_template =
            dotenvy::var("COMMAND_TEMPLATE").unwrap_or_else(|_| DEFAULT_TEMPLATE.to_string());
        // Validated here so a malformed template aborts startup instead of
        // failing on the first request.
        let template = CommandTemplate::parse(&raw_template)
            .with_context(|| format!("invalid COMMAND_TEMPLATE: {raw_template}"))?;

        let host = dotenvy::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match dotenvy::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let debug = dotenvy::var("DEBUG_MODE")
            .map(|v| !matches!(v.trim(), "0" | "false" | "no"))
            .unwrap_or(true);

        let model_id = dotenvy::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());

        Ok(Self {
            template,
            host,
            port,
            debug,
            model_id,
        })
    }
}
