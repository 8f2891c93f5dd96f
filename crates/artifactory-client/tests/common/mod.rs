//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use artifactory_client::{
    ArtifactoryClient, ClientConfig, ClientError, HttpRequest, HttpResponse, Result, RetryPolicy,
    Transport,
};
use async_trait::async_trait;

/// Transport that records every request and replays scripted responses.
///
/// When the script runs out, the last scripted reply is repeated.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[derive(Clone)]
pub enum Reply {
    Response(u16, String),
    NetworkError(String),
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Response(status, body.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::NetworkError(message.to_string()));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);

        let next = self.replies.lock().unwrap().pop_front();
        let reply = match next {
            Some(reply) => {
                *self.last.lock().unwrap() = Some(reply.clone());
                reply
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Reply::Response(200, String::new())),
        };

        match reply {
            Reply::Response(status, body) => Ok(HttpResponse::new(status, body)),
            Reply::NetworkError(message) => Err(ClientError::Network { message }),
        }
    }
}

pub const BASE_URL: &str = "http://localhost:8081";

/// Basic-auth config (`u`/`p`) with a fast retry policy
pub fn basic_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(base_url)
        .with_basic_auth("u", "p")
        .with_retry(RetryPolicy::new(3, Duration::from_millis(5)))
}

pub fn client_with(transport: &Arc<MockTransport>) -> ArtifactoryClient {
    ArtifactoryClient::with_transport(basic_config(BASE_URL), transport.clone())
        .expect("client")
}

pub fn virtual_repo_json(key: &str, members: &[&str]) -> String {
    serde_json::json!({
        "key": key,
        "rclass": "virtual",
        "packageType": "maven",
        "repositories": members,
        "includesPattern": "**/*",
    })
    .to_string()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
