//! Adapters that plug a `Hook` into the host logging frameworks.
//!
//! Both adapters skip events from the crates the HTTP transport is built
//! on, and any event emitted on a thread that is running a delivery, since
//! forwarding those would feed each delivery back into the hook.
pub mod log_adapter;
pub mod tracing_layer;

use crate::notification::HookError;
use std::sync::Arc;

pub use log_adapter::WebhookLogger;
pub use tracing_layer::WebhookLayer;

/// Targets whose events are never forwarded by default.
pub const DEFAULT_IGNORED_TARGETS: &[&str] = &[
    "logcord",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "want",
    "mio",
    "tokio",
    "tower",
    "rustls",
    "native_tls",
    "openssl",
];

/// Receives the errors a hook returns; the host's error channel.
pub type ErrorHandler = Arc<dyn Fn(&HookError) + Send + Sync>;

/// Writes the error to stderr, the one sink that cannot loop back.
pub fn stderr_error_handler() -> ErrorHandler {
    Arc::new(|err: &HookError| eprintln!("Failed to fire hook: {}", err))
}

/// Whether `target` equals one of `ignored` or is a module beneath it.
pub(crate) fn is_ignored_target(target: &str, ignored: &[String]) -> bool {
    ignored.iter().any(|prefix| {
        target == prefix
            || target
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

pub(crate) fn default_ignored_targets() -> Vec<String> {
    DEFAULT_IGNORED_TARGETS.iter().map(|t| t.to_string()).collect()
}
