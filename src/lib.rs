/// logcord - Chat webhook notifications for Rust logging
///
/// This library turns log events at or above a configured severity into a
/// webhook message with a single embed, and posts it either synchronously
/// or in the background. It plugs into `tracing` and `log` through the
/// adapters in `integrations`.
pub mod cli;
pub mod config;
pub mod core;
pub mod integrations;
pub mod levels;
pub mod notification;

// Re-export core types for convenience
pub use crate::core::*;
pub use config::{HookConfig, HookOptions};
pub use levels::{level_threshold, LevelColors};
pub use notification::{HookError, WebhookHook};
