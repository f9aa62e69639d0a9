//! Renders a log event into a webhook message with a single embed.

use crate::config::HookOptions;
use crate::core::{FieldValue, LogEvent};
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("field {field:?} holds a non-finite number, which JSON cannot represent")]
    NonFiniteNumber { field: String },

    #[error("invalid timestamp format {0:?}")]
    TimestampFormat(String),

    #[error("failed to serialize webhook payload: {0}")]
    Json(#[source] serde_json::Error),
}

/// The top-level webhook message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: Value,
    pub inline: bool,
}

/// Builds the webhook message for `event`.
///
/// # Returns
/// * `Err(EncodingError)` if a field value or the timestamp cannot be rendered
pub fn build_payload(event: &LogEvent, opts: &HookOptions) -> Result<WebhookPayload, EncodingError> {
    let footer = if opts.disable_timestamp {
        None
    } else {
        Some(EmbedFooter {
            text: render_timestamp(event, opts.timestamp_format())?,
        })
    };

    let inline = !opts.disable_inline_fields;
    let fields = event
        .fields
        .iter()
        .map(|(name, value)| {
            Ok(EmbedField {
                name: name.clone(),
                value: field_to_json(name, value)?,
                inline,
            })
        })
        .collect::<Result<Vec<_>, EncodingError>>()?;

    let embed = Embed {
        title: event.level.as_str().to_uppercase(),
        description: event.message.clone(),
        color: opts.level_colors().level_color(event.level),
        author: opts.author().map(|name| EmbedAuthor {
            name: name.to_string(),
        }),
        footer,
        fields,
    };

    Ok(WebhookPayload {
        username: opts.username().map(str::to_string),
        embeds: vec![embed],
    })
}

/// Builds the webhook message for `event` and serializes it to JSON bytes.
pub fn encode_payload(event: &LogEvent, opts: &HookOptions) -> Result<Vec<u8>, EncodingError> {
    let payload = build_payload(event, opts)?;
    serde_json::to_vec(&payload).map_err(EncodingError::Json)
}

fn render_timestamp(event: &LogEvent, pattern: Option<&str>) -> Result<String, EncodingError> {
    let mut text = String::new();
    match pattern {
        // chrono reports unknown specifiers as a formatting error
        Some(pattern) => write!(text, "{}", event.time.format(pattern))
            .map_err(|_| EncodingError::TimestampFormat(pattern.to_string()))?,
        None => write!(text, "{}", event.time)
            .map_err(|_| EncodingError::TimestampFormat(String::new()))?,
    }
    Ok(text)
}

fn field_to_json(name: &str, value: &FieldValue) -> Result<Value, EncodingError> {
    Ok(match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::I64(i) => Value::from(*i),
        FieldValue::U64(u) => Value::from(*u),
        FieldValue::F64(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| EncodingError::NonFiniteNumber {
                field: name.to_string(),
            })?,
        FieldValue::Str(s) => Value::String(s.clone()),
        FieldValue::Json(v) => v.clone(),
    })
}
