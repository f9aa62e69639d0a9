//! A `tracing_subscriber` layer that forwards events to a `Hook`.
//!
//! Records bridged from the `log` facade arrive with the target `log`; the
//! layer reads their real target and level through `tracing_log` so the
//! ignore list applies to them as well.

use super::{default_ignored_targets, is_ignored_target, stderr_error_handler, ErrorHandler};
use crate::core::{FieldValue, Hook, Level, LogEvent};
use crate::notification::webhook::in_delivery;
use chrono::Local;
use std::collections::HashMap;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_log::NormalizeEvent;
use tracing_subscriber::layer::{Context, Layer};

/// Forwards every `tracing` event whose level the hook accepts.
///
/// The `message` field becomes the event message; every other field is
/// passed on with its native type where tracing records one.
pub struct WebhookLayer<H> {
    hook: H,
    ignored_targets: Vec<String>,
    on_error: ErrorHandler,
}

impl<H: Hook> WebhookLayer<H> {
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
}

impl<S, H> Layer<S> for WebhookLayer<H>
where
    S: Subscriber,
    H: Hook + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if in_delivery() {
            return;
        }
        let normalized = event.normalized_metadata();
        let metadata = normalized.as_ref().unwrap_or_else(|| event.metadata());
        if is_ignored_target(metadata.target(), &self.ignored_targets) {
            return;
        }
        let level = Level::from(*metadata.level());
        if !self.hook.levels().contains(&level) {
            return;
        }

        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);
        let log_event = LogEvent {
            level,
            message: visitor.message.unwrap_or_default(),
            time: Local::now(),
            fields: visitor.fields,
        };

        if let Err(err) = self.hook.fire(&log_event) {
            (self.on_error)(&err);
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: HashMap<String, FieldValue>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: FieldValue) {
        // log.target, log.module_path, log.file and log.line from tracing-log
        if field.name().starts_with("log.") {
            return;
        }
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldCollector {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, FieldValue::F64(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, FieldValue::U64(value));
    }

    fn record_i128(&mut self, field: &Field, value: i128) {
        let value = i64::try_from(value).map_or_else(|_| FieldValue::Str(value.to_string()), FieldValue::I64);
        self.insert(field, value);
    }

    fn record_u128(&mut self, field: &Field, value: u128) {
        let value = u64::try_from(value).map_or_else(|_| FieldValue::Str(value.to_string()), FieldValue::U64);
        self.insert(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, FieldValue::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, FieldValue::Str(value.to_string()));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, FieldValue::Str(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, FieldValue::Str(format!("{:?}", value)));
        }
    }
}
