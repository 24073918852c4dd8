//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use figi_core::{
    Backoff, ClientConfig, FigiClient, HttpClient, HttpError, HttpRequest, HttpResponse,
};

/// Replays scripted responses in order and records every request it sees.
/// Once the script runs out it answers `200 {}`.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(script: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn json_pages(pages: &[&str]) -> Arc<Self> {
        Self::new(
            pages
                .iter()
                .map(|page| Ok(HttpResponse::ok_json(*page)))
                .collect(),
        )
    }

    pub fn statuses(statuses: &[u16]) -> Arc<Self> {
        Self::new(
            statuses
                .iter()
                .map(|status| Ok(HttpResponse::new(*status, "")))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.requests()
            .into_iter()
            .map(|request| {
                serde_json::from_str(request.body.as_deref().unwrap_or("null"))
                    .expect("request body should be JSON")
            })
            .collect()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self
            .script
            .lock()
            .expect("script should not be poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::ok_json("{}")));
        Box::pin(async move { response })
    }
}

/// Config pointing at a fake host with instant retries.
pub fn test_config(raise_on_error: bool, retry_count: u32) -> ClientConfig {
    ClientConfig::default()
        .with_base_url("https://figi.test")
        .with_raise_on_error(raise_on_error)
        .with_retry_count(retry_count)
        .with_backoff(Backoff::Fixed {
            delay: Duration::ZERO,
        })
}

pub fn client(transport: &Arc<ScriptedHttpClient>, config: ClientConfig) -> FigiClient {
    FigiClient::with_http_client(config, transport.clone())
}
