//! A hook that takes every level must not be fed by its own transport.
//!
//! This lives in its own test binary because it installs the process-wide
//! subscriber, which also bridges the `log` facade that reqwest logs through.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::options_without_timestamp;
use logcord::integrations::{WebhookLayer, DEFAULT_IGNORED_TARGETS};
use logcord::notification::webhook::{DeliveryError, ReqwestTransport, Transport};
use logcord::{Level, WebhookHook};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Logs under a target nobody ignores, then posts for real.
struct ChattyTransport {
    inner: ReqwestTransport,
}

impl Transport for ChattyTransport {
    fn post(&self, url: &str, body: &[u8]) -> Result<(), DeliveryError> {
        tracing::info!(target: "chatty_transport", bytes = body.len(), "posting");
        log::debug!(target: "chatty_transport", "posting through log");
        self.inner.post(url, body)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_trace_level_hook_sends_exactly_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let transport = ChattyTransport {
        inner: ReqwestTransport::new(Duration::from_secs(5)),
    };
    let hook = WebhookHook::new(
        &format!("{}/webhook", server.uri()),
        Level::Trace,
        options_without_timestamp(),
    )
    .unwrap()
    .with_transport(Arc::new(transport));

    // The mock server runs in this process too.
    let ignored = DEFAULT_IGNORED_TARGETS
        .iter()
        .copied()
        .chain(["wiremock"]);
    tracing_subscriber::registry()
        .with(WebhookLayer::new(hook).with_ignored_targets(ignored))
        .init();

    // What reqwest's blocking client logs while it waits on a response.
    log::trace!(target: "reqwest::blocking::wait", "park without timeout");
    tracing::error!(target: "app", volume = "/data", "disk full");

    tokio::time::sleep(Duration::from_millis(500)).await;
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "the hook fed itself");

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["embeds"][0]["description"], "disk full");
}
