//! A `log::Log` implementation that forwards records to a `Hook`.

use super::{default_ignored_targets, is_ignored_target, stderr_error_handler, ErrorHandler};
use crate::core::{FieldValue, Hook, Level, LogEvent};
use crate::notification::webhook::in_delivery;
use log::kv::{self, Key, Value, VisitSource};
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashMap;

/// Forwards `log` records whose level the hook accepts.
///
/// Key/values attached to a record become event fields. Integers, floats,
/// booleans and strings keep their type; anything else is sent as its
/// `Display` text.
pub struct WebhookLogger<H> {
    hook: H,
    ignored_targets: Vec<String>,
    on_error: ErrorHandler,
}

impl<H: Hook + 'static> WebhookLogger<H> {
    pub fn new(hook: H) -> Self {
        Self {
            hook,
            ignored_targets: default_ignored_targets(),
            on_error: stderr_error_handler(),
        }
    }

    /// Replaces the list of targets that are never forwarded.
    pub fn with_ignored_targets<I, T>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.ignored_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Sets where errors returned by the hook are reported.
    pub fn with_error_handler(mut self, on_error: ErrorHandler) -> Self {
        self.on_error = on_error;
        self
    }

    /// The most verbose `log` filter that still reaches the hook.
    pub fn max_level(&self) -> LevelFilter {
        level_filter(&self.hook.levels())
    }

    /// Installs this logger as the global `log` logger.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

/// Maps a set of accepted levels to the loosest `log` filter covering them.
///
/// `log` has no levels above `Error`, so a hook that only takes `Fatal` or
/// `Panic` never sees a `log` record.
pub fn level_filter(levels: &[Level]) -> LevelFilter {
    match levels.iter().min() {
        Some(Level::Trace) => LevelFilter::Trace,
        Some(Level::Debug) => LevelFilter::Debug,
        Some(Level::Info) => LevelFilter::Info,
        Some(Level::Warn) => LevelFilter::Warn,
        Some(Level::Error) => LevelFilter::Error,
        Some(Level::Fatal) | Some(Level::Panic) | None => LevelFilter::Off,
    }
}

impl<H: Hook + 'static> log::Log for WebhookLogger<H> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        !in_delivery()
            && !is_ignored_target(metadata.target(), &self.ignored_targets)
            && self.hook.levels().contains(&Level::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut collector = KeyValueCollector::default();
        // The collector never fails a pair, so an error here is the source's own.
        let _ = record.key_values().visit(&mut collector);

        let mut event = LogEvent::new(Level::from(record.level()), record.args().to_string());
        event.fields = collector.fields;
        if let Err(err) = self.hook.fire(&event) {
            (self.on_error)(&err);
        }
    }

    fn flush(&self) {}
}

#[derive(Default)]
struct KeyValueCollector {
    fields: HashMap<String, FieldValue>,
}

impl<'kvs> VisitSource<'kvs> for KeyValueCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        self.fields.insert(key.as_str().to_string(), field_value(&value));
        Ok(())
    }
}

fn field_value(value: &Value<'_>) -> FieldValue {
    if let Some(i) = value.to_i64() {
        FieldValue::I64(i)
    } else if let Some(u) = value.to_u64() {
        FieldValue::U64(u)
    } else if let Some(f) = value.to_f64() {
        FieldValue::F64(f)
    } else if let Some(b) = value.to_bool() {
        FieldValue::Bool(b)
    } else if let Some(s) = value.to_borrowed_str() {
        FieldValue::Str(s.to_string())
    } else {
        FieldValue::Str(value.to_string())
    }
}
