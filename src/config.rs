//! Configuration management for logcord
//!
//! This module defines the `HookConfig` struct and the `HookOptions` that
//! shape every notification. It uses the `figment` crate to load settings
//! from a `logcord.toml` file and merge them with environment variables and
//! command-line arguments.

use crate::cli::Cli;
use crate::core::Level;
use crate::levels::LevelColors;
use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Timeout applied to each webhook request unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Everything needed to register a webhook hook with a host logger.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HookConfig {
    /// The full webhook URL, including id and token.
    pub webhook_url: String,
    /// The least severe level that is forwarded.
    pub min_level: Level,
    /// How notifications are rendered and delivered.
    #[serde(default)]
    pub options: HookOptions,
}

/// Options controlling how a log event is rendered and sent.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HookOptions {
    /// Replaces the webhook's default sender name when set and non-empty.
    pub username: Option<String>,
    /// Adds an author block when set and non-empty.
    pub author: Option<String>,
    /// Send in the background and discard the outcome.
    pub asynchronous: bool,
    /// Render fields one per line instead of in columns.
    pub disable_inline_fields: bool,
    /// Use `custom_level_colors` instead of the built-in colors.
    pub enable_custom_colors: bool,
    /// Colors used when `enable_custom_colors` is set.
    pub custom_level_colors: Option<LevelColors>,
    /// Leave the footer timestamp out.
    pub disable_timestamp: bool,
    /// A strftime pattern for the footer timestamp.
    pub timestamp_format: Option<String>,
    /// Per-request timeout for the HTTP transport, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for HookOptions {
    fn default() -> Self {
        Self {
            username: None,
            author: None,
            asynchronous: false,
            disable_inline_fields: false,
            enable_custom_colors: false,
            custom_level_colors: None,
            disable_timestamp: false,
            timestamp_format: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid webhook URL {url:?}: {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    #[error("custom colors are enabled but no custom_level_colors table is set")]
    MissingCustomColors,

    #[error("invalid timestamp format {0:?}")]
    InvalidTimestampFormat(String),

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
}

impl HookOptions {
    /// The color table selected by `enable_custom_colors`.
    pub fn level_colors(&self) -> LevelColors {
        match (self.enable_custom_colors, self.custom_level_colors) {
            (true, Some(colors)) => colors,
            // Rejected by `validate`; an unvalidated table renders black.
            (true, None) => LevelColors::ZERO,
            (false, _) => LevelColors::DEFAULT,
        }
    }

    /// The configured sender name, if non-empty.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|s| !s.is_empty())
    }

    /// The configured author label, if non-empty.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref().filter(|s| !s.is_empty())
    }

    /// The configured timestamp pattern, if non-empty.
    pub fn timestamp_format(&self) -> Option<&str> {
        self.timestamp_format.as_deref().filter(|s| !s.is_empty())
    }

    /// Checks the options for combinations that cannot render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enable_custom_colors && self.custom_level_colors.is_none() {
            return Err(ConfigError::MissingCustomColors);
        }
        if let Some(pattern) = self.timestamp_format() {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(ConfigError::InvalidTimestampFormat(pattern.to_string()));
            }
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        Ok(())
    }
}

/// Checks that `url` is an absolute http(s) URL.
pub fn validate_webhook_url(url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidWebhookUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {:?}", other))),
    }
}

impl HookConfig {
    /// Checks the URL and the options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_webhook_url(&self.webhook_url)?;
        self.options.validate()
    }

    /// Builds the layered figment: defaults, then the optional TOML file,
    /// then `LOGCORD_`-prefixed environment variables.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(HookConfig::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        // e.g. LOGCORD_MIN_LEVEL=error, LOGCORD_OPTIONS__USERNAME=bot
        figment.merge(Env::prefixed("LOGCORD_").split("__"))
    }

    /// Loads and validates the configuration from the specified file.
    ///
    /// # Arguments
    /// * `config_path` - The path to the TOML configuration file.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::extract(Self::figment(config_path))
    }

    /// Loads the configuration, letting command-line arguments override
    /// every other source.
    pub fn load_from_cli(cli: &Cli) -> Result<Self> {
        Self::extract(Self::figment(cli.config.as_deref()).merge(cli.clone()))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: HookConfig = figment
            .extract()
            .context("Failed to read logcord configuration")?;
        config.validate().context("Invalid logcord configuration")?;
        info!(min_level = %config.min_level, "Loaded webhook hook configuration");
        debug!(?config.options, "Hook options");
        Ok(config)
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            min_level: Level::Warn,
            options: HookOptions::default(),
        }
    }
}
