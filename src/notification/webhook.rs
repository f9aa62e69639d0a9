//! Delivery of encoded webhook messages over HTTP.
//!
//! Synchronous delivery blocks the caller until the webhook answers and
//! reports any failure. Asynchronous delivery hands the request to a
//! background worker and returns at once: the outcome is never reported,
//! deliveries are not ordered relative to each other, and nothing limits how
//! many are in flight.

use std::cell::Cell;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Content type sent with every webhook request.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("HTTP request to webhook failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("webhook responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("webhook delivery worker panicked")]
    WorkerPanicked,
}

/// A trait for anything that can POST an encoded payload to a URL.
pub trait Transport: Send + Sync {
    /// Posts `body` as JSON to `url`, blocking until the request completes.
    fn post(&self, url: &str, body: &[u8]) -> Result<(), DeliveryError>;
}

/// A transport backed by reqwest's blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Transport for ReqwestTransport {
    fn post(&self, url: &str, body: &[u8]) -> Result<(), DeliveryError> {
        // Built on the calling thread; the blocking client owns a runtime
        // that must not be created or dropped inside an async context.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| DeliveryError::Client(e.to_string()))?;

        let response = client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body.to_vec())
            .send()
            .map_err(DeliveryError::Transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().unwrap_or_default();
            Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// How a payload is handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Wait for the response and report failures.
    Synchronous,
    /// Fire and forget.
    Asynchronous,
}

impl DeliveryMode {
    pub fn from_asynchronous(asynchronous: bool) -> Self {
        if asynchronous {
            DeliveryMode::Asynchronous
        } else {
            DeliveryMode::Synchronous
        }
    }
}

/// Sends encoded payloads through a `Transport`.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Delivers `body` to `url`.
    ///
    /// In synchronous mode the request runs on a scoped worker thread that
    /// the caller joins, which keeps the blocking client off any async
    /// runtime the caller may be running on. In asynchronous mode this
    /// always returns `Ok(())`; the request runs on tokio's blocking pool
    /// when a runtime is current and on a detached thread otherwise.
    pub fn deliver(&self, url: &str, body: Vec<u8>, mode: DeliveryMode) -> Result<(), DeliveryError> {
        match mode {
            DeliveryMode::Synchronous => thread::scope(|scope| {
                scope
                    .spawn(|| post_marked(self.transport.as_ref(), url, &body))
                    .join()
                    .unwrap_or(Err(DeliveryError::WorkerPanicked))
            }),
            DeliveryMode::Asynchronous => {
                let transport = Arc::clone(&self.transport);
                let url = url.to_string();
                let send = move || {
                    let _ = post_marked(transport.as_ref(), &url, &body);
                };
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        drop(handle.spawn_blocking(send));
                    }
                    Err(_) => {
                        drop(thread::spawn(send));
                    }
                }
                Ok(())
            }
        }
    }
}

thread_local! {
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is in the middle of a webhook request.
///
/// The adapters drop events emitted from such a thread, whatever their
/// target, so the transport's own logging never turns into another delivery.
pub(crate) fn in_delivery() -> bool {
    DELIVERING.with(Cell::get)
}

struct DeliveryMark;

impl DeliveryMark {
    fn set() -> Self {
        DELIVERING.with(|d| d.set(true));
        DeliveryMark
    }
}

impl Drop for DeliveryMark {
    fn drop(&mut self) {
        DELIVERING.with(|d| d.set(false));
    }
}

fn post_marked(transport: &dyn Transport, url: &str, body: &[u8]) -> Result<(), DeliveryError> {
    let _mark = DeliveryMark::set();
    transport.post(url, body)
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
