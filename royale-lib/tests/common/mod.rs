//! In-process transports and fixtures shared by the integration suites.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use royale_lib::AsyncClient;
use royale_lib::BlockingClient;
use royale_lib::ClientConfig;
use royale_lib::clock::ManualClock;
use royale_lib::transport::AsyncTransport;
use royale_lib::transport::BlockingTransport;
use royale_lib::transport::HttpRequest;
use royale_lib::transport::ResponseEnvelope;
use royale_lib::transport::TransportError;
use serde_json::Value;
use serde_json::json;

/// Answers requests from a script and records what it was sent.
///
/// Scripted responses are served in order; once they run out the fallback is repeated.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<ResponseEnvelope>>,
    fallback: Option<ResponseEnvelope>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every request with `envelope`.
    pub fn always(envelope: ResponseEnvelope) -> Self {
        Self {
            fallback: Some(envelope),
            ..Self::default()
        }
    }

    /// Answers every request with a JSON body.
    pub fn json(status: u16, body: Value) -> Self {
        Self::always(ResponseEnvelope::json_body(status, &body))
    }

    /// Queues a response.
    pub fn then(self, envelope: ResponseEnvelope) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(envelope);
        self
    }

    /// Delays every async response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_url(&self) -> Option<String> {
        self.requests.lock().unwrap().last().map(|r| r.url.clone())
    }

    fn answer(&self, request: &HttpRequest) -> Result<ResponseEnvelope, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.script.lock().unwrap().pop_front();
        scripted
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| TransportError::Other("no response scripted".to_string()))
    }
}

#[async_trait]
impl AsyncTransport for MockTransport {
    async fn send(&self, request: &HttpRequest, _timeout: Duration) -> Result<ResponseEnvelope, TransportError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer(request)
    }
}

impl BlockingTransport for MockTransport {
    fn send(&self, request: &HttpRequest, _timeout: Duration) -> Result<ResponseEnvelope, TransportError> {
        self.answer(request)
    }
}

pub fn blocking_client(config: ClientConfig, transport: &Arc<MockTransport>) -> (BlockingClient, ManualClock) {
    let clock = ManualClock::default();
    let client = BlockingClient::from_parts(config, transport.clone(), Arc::new(clock.clone())).unwrap();
    (client, clock)
}

pub fn async_client(config: ClientConfig, transport: &Arc<MockTransport>) -> (AsyncClient, ManualClock) {
    let clock = ManualClock::default();
    let client = AsyncClient::from_parts(config, transport.clone(), Arc::new(clock.clone())).unwrap();
    (client, clock)
}

/// Adds quota headers with a reset `secs` after `now`, in epoch milliseconds.
pub fn with_quota(envelope: ResponseEnvelope, remaining: u32, now: DateTime<Utc>, secs: i64) -> ResponseEnvelope {
    let reset = now + chrono::Duration::seconds(secs);
    envelope
        .with_header("x-ratelimit-limit", "10")
        .with_header("x-ratelimit-remaining", remaining.to_string())
        .with_header("x-ratelimit-reset", reset.timestamp_millis().to_string())
}

pub fn player_json() -> Value {
    json!({
        "tag": "#2P0LYQ",
        "name": "Alpha",
        "expLevel": 13,
        "trophies": 5123,
        "bestTrophies": 6011,
        "clan": {"tag": "#8L9L9GL", "name": "Reddit Alpha", "badgeId": 16000002},
        "arena": {"id": 54000012, "name": "Legendary Arena"},
        "cards": [],
        "currentDeck": [
            {"name": "Knight", "id": 26000000, "level": 13, "maxLevel": 13},
            {"name": "Archers", "id": 26000001, "level": 13, "maxLevel": 13}
        ]
    })
}

pub fn member_json(tag: &str, name: &str) -> Value {
    json!({"tag": tag, "name": name, "role": "member", "trophies": 4000})
}
