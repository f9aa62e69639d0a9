//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the `logcord` binary
//! using the `clap` crate. Hook settings given here are merged over the
//! `logcord.toml` file and environment variables; the remaining arguments
//! describe the sample event the binary sends.

use crate::core::{FieldValue, Level};
use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Sends a log event to a chat webhook the same way the logging hook does.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Webhook URL to post to.
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Least severe level the hook forwards.
    #[arg(long, value_name = "LEVEL")]
    pub min_level: Option<Level>,

    /// Sender name shown instead of the webhook's default.
    #[arg(long)]
    pub username: Option<String>,

    /// Send without waiting for the webhook to answer.
    #[arg(long = "async")]
    pub asynchronous: bool,

    /// Level of the event to send.
    #[arg(short, long, default_value = "info")]
    pub level: Level,

    /// Message of the event to send.
    #[arg(short, long, default_value = "logcord test notification")]
    pub message: String,

    /// A `key=value` field to attach; may be repeated.
    #[arg(short, long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, FieldValue)>,
}

/// Parses `key=value`, keeping integers, floats and booleans native.
fn parse_field(raw: &str) -> Result<(String, FieldValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", raw))?;
    if key.is_empty() {
        return Err("field name must not be empty".to_string());
    }
    let value = if let Ok(b) = value.parse::<bool>() {
        FieldValue::Bool(b)
    } else if let Ok(i) = value.parse::<i64>() {
        FieldValue::I64(i)
    } else if let Some(f) = value.parse::<f64>().ok().filter(|f| f.is_finite()) {
        FieldValue::F64(f)
    } else {
        FieldValue::Str(value.to_string())
    };
    Ok((key.to_string(), value))
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();
        let mut options = Dict::new();

        if let Some(url) = &self.webhook_url {
            dict.insert("webhook_url".into(), Value::from(url.clone()));
        }

        if let Some(level) = self.min_level {
            dict.insert("min_level".into(), Value::from(level.as_str()));
        }

        if let Some(username) = &self.username {
            options.insert("username".into(), Value::from(username.clone()));
        }

        // A bare flag cannot say "false", so only an explicit `--async` overrides.
        if self.asynchronous {
            options.insert("asynchronous".into(), Value::from(true));
        }

        if !options.is_empty() {
            dict.insert("options".into(), Value::from(options));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
