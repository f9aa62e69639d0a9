//! Core domain types and the hook contract for logcord
//!
//! This module defines the severity enumeration shared with the host logging
//! framework, the read-only view of a log event that the bridge consumes, and
//! the `Hook` trait a host calls into once per qualifying event.

use crate::notification::hook::HookError;
use crate::notification::payload::EncodingError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Severity of a log event, ordered from least to most severe.
///
/// The ordering is fixed: `Trace < Debug < Info < Warn < Error < Fatal < Panic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    #[serde(rename = "warning", alias = "warn")]
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    /// Every level, most severe first.
    pub const ALL: [Level; 7] = [
        Level::Panic,
        Level::Fatal,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// The lowercase name of the level, as the host prints it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a valid log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            "panic" => Ok(Level::Panic),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            _ => Level::Error,
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

/// A field value attached to a log event.
///
/// Only values with a native JSON representation are accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    /// A nested structure, already in JSON form.
    Json(serde_json::Value),
}

impl FieldValue {
    /// Converts any serializable value into a field value.
    ///
    /// # Returns
    /// * `Err(EncodingError)` if the value has no JSON representation
    ///   (for example a map keyed by something other than strings).
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, EncodingError> {
        let json = serde_json::to_value(value).map_err(EncodingError::Json)?;
        Ok(FieldValue::Json(json))
    }
}

macro_rules! field_value_from {
    ($variant:ident, $as:ty, $($t:ty),+) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::$variant(v as $as)
            }
        })+
    };
}

field_value_from!(I64, i64, i8, i16, i32, i64, isize);
field_value_from!(U64, u64, u8, u16, u32, u64, usize);
field_value_from!(F64, f64, f32, f64);

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Json(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// A single log event as handed over by the host framework.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// Severity of the event
    pub level: Level,
    /// Free-text log message
    pub message: String,
    /// When the event was emitted
    pub time: DateTime<Local>,
    /// Contextual key/value pairs; iteration order is unspecified
    pub fields: HashMap<String, FieldValue>,
}

impl LogEvent {
    /// Creates an event stamped with the current local time and no fields.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            time: Local::now(),
            fields: HashMap::new(),
        }
    }

    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = time;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

// =============================================================================
// Hook Trait
// =============================================================================

/// A sink the host logging framework invokes for qualifying events.
///
/// Implementations may be called concurrently from several threads and must
/// not rely on state shared across calls.
pub trait Hook: Send + Sync {
    /// The levels this hook wants to receive, most severe first.
    fn levels(&self) -> Vec<Level>;

    /// Handles one event.
    ///
    /// # Returns
    /// * `Ok(())` once the event was handled (or handed off, in asynchronous mode)
    /// * `Err(HookError)` if the event could not be encoded or delivered
    fn fire(&self, event: &LogEvent) -> Result<(), HookError>;
}

impl<H: Hook + ?Sized> Hook for std::sync::Arc<H> {
    fn levels(&self) -> Vec<Level> {
        (**self).levels()
    }

    fn fire(&self, event: &LogEvent) -> Result<(), HookError> {
        (**self).fire(event)
    }
}
