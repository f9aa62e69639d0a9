//! The webhook hook a host logger registers.

use crate::config::{validate_webhook_url, ConfigError, HookConfig, HookOptions};
use crate::core::{Hook, Level, LogEvent};
use crate::levels::level_threshold;
use crate::notification::payload::{encode_payload, EncodingError};
use crate::notification::webhook::{DeliveryError, DeliveryMode, Dispatcher, ReqwestTransport, Transport};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Sends every qualifying log event to a chat webhook as a single embed.
///
/// The hook holds no mutable state; `fire` may be called from any number of
/// threads at once. In asynchronous mode `fire` returns as soon as the event
/// is encoded: delivery failures are dropped, and two events may arrive out
/// of order.
///
/// The hook never logs on its own behalf, since its own log events would be
/// routed back into it.
#[derive(Debug, Clone)]
pub struct WebhookHook {
    webhook_url: String,
    min_level: Level,
    opts: Arc<HookOptions>,
    dispatcher: Dispatcher,
}

impl WebhookHook {
    /// Creates a hook posting to `webhook_url` through reqwest.
    pub fn new(
        webhook_url: impl Into<String>,
        min_level: Level,
        opts: HookOptions,
    ) -> Result<Self, ConfigError> {
        let webhook_url = webhook_url.into();
        validate_webhook_url(&webhook_url)?;
        opts.validate()?;
        let transport = ReqwestTransport::new(Duration::from_millis(opts.request_timeout_ms));
        Ok(Self {
            webhook_url,
            min_level,
            opts: Arc::new(opts),
            dispatcher: Dispatcher::new(Arc::new(transport)),
        })
    }

    pub fn from_config(config: &HookConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.webhook_url.clone(),
            config.min_level,
            config.options.clone(),
        )
    }

    /// Replaces the HTTP transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.dispatcher = Dispatcher::new(transport);
        self
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn options(&self) -> &HookOptions {
        &self.opts
    }
}

impl Hook for WebhookHook {
    fn levels(&self) -> Vec<Level> {
        level_threshold(self.min_level)
    }

    fn fire(&self, event: &LogEvent) -> Result<(), HookError> {
        // Encoding happens here, before any hand-off, so its errors always
        // reach the caller.
        let body = encode_payload(event, &self.opts)?;
        let mode = DeliveryMode::from_asynchronous(self.opts.asynchronous);
        self.dispatcher.deliver(&self.webhook_url, body, mode)?;
        Ok(())
    }
}
