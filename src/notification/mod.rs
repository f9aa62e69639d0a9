//! Turns log events into chat webhook messages and delivers them.
//!
//! `payload` renders an event into the webhook's JSON shape, `webhook`
//! posts the encoded message, and `hook` ties both together behind the
//! `Hook` trait a host logging framework calls.
pub mod hook;
pub mod payload;
pub mod webhook;

pub use hook::{HookError, WebhookHook};
pub use payload::{build_payload, encode_payload, EncodingError, WebhookPayload};
pub use webhook::{DeliveryError, DeliveryMode, Dispatcher, ReqwestTransport, Transport};
