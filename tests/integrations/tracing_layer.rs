//! Integration tests for the tracing and log adapters driving a real hook.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::{mock_transport::MockTransport, options_without_timestamp};
use logcord::integrations::{WebhookLayer, WebhookLogger};
use logcord::{HookError, HookOptions, Level, WebhookHook};
use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;

fn hook_with_mock(min_level: Level, opts: HookOptions) -> (Arc<WebhookHook>, MockTransport) {
    let transport = MockTransport::new();
    let hook = WebhookHook::new("https://chat.example.com/api/webhooks/1/token", min_level, opts)
        .unwrap()
        .with_transport(Arc::new(transport.clone()));
    (Arc::new(hook), transport)
}

#[test]
fn test_tracing_events_become_embeds() {
    let (hook, transport) = hook_with_mock(Level::Info, options_without_timestamp());
    let subscriber = tracing_subscriber::registry().with(WebhookLayer::new(hook));

    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!("too quiet");
        tracing::error!(volume = "/data", free_bytes = 0u64, "disk full");
    });

    let bodies = transport.sent_bodies();
    assert_eq!(bodies.len(), 1);
    let embed = &bodies[0]["embeds"][0];
    assert_eq!(embed["title"], "ERROR");
    assert_eq!(embed["description"], "disk full");
    let fields = embed["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    let free = fields.iter().find(|f| f["name"] == "free_bytes").unwrap();
    assert_eq!(free["value"], 0);
    assert_eq!(free["inline"], true);
}

#[test]
fn test_tracing_encoding_errors_reach_the_error_handler() {
    let (hook, transport) = hook_with_mock(Level::Info, HookOptions::default());
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let layer = WebhookLayer::new(hook).with_error_handler(Arc::new(move |err: &HookError| {
        sink.lock().unwrap().push(err.to_string());
    }));
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(ratio = f64::NAN, "bad ratio");
    });

    assert!(transport.sent_bodies().is_empty());
    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("ratio"));
}

#[test]
fn test_log_records_become_embeds() {
    use log::Log;

    let (hook, transport) = hook_with_mock(Level::Warn, options_without_timestamp());
    let logger = WebhookLogger::new(hook);

    logger.log(
        &log::Record::builder()
            .level(log::Level::Warn)
            .target("billing")
            .args(format_args!("retrying charge {}", 42))
            .build(),
    );

    let bodies = transport.sent_bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["embeds"][0]["title"], "WARNING");
    assert_eq!(bodies[0]["embeds"][0]["description"], "retrying charge 42");
}

#[test]
fn test_log_key_values_become_embed_fields() {
    use log::Log;

    let (hook, transport) = hook_with_mock(Level::Warn, options_without_timestamp());
    let logger = WebhookLogger::new(hook);

    logger.log(
        &log::Record::builder()
            .level(log::Level::Error)
            .target("app")
            .args(format_args!("disk full"))
            .key_values(&[("volume", "/data")])
            .build(),
    );

    let bodies = transport.sent_bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0]["embeds"][0]["fields"],
        serde_json::json!([{ "name": "volume", "value": "/data", "inline": true }])
    );
}
