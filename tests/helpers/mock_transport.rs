//! A mock transport for exercising the hook without a network.

use logcord::notification::{DeliveryError, Transport};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    pub sent: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_bodies(&self) -> Vec<serde_json::Value> {
        self.sent.lock().unwrap().iter().map(|(_, body)| body.clone()).collect()
    }
}

impl Transport for MockTransport {
    fn post(&self, url: &str, body: &[u8]) -> Result<(), DeliveryError> {
        let body = serde_json::from_slice(body).expect("payload is not valid JSON");
        self.sent.lock().unwrap().push((url.to_string(), body));
        Ok(())
    }
}
