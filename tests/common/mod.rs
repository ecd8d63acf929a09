#![allow(dead_code)]

use market_pulse_client::domain::errors::TransportFailureKind;
use market_pulse_client::infrastructure::{
    ApiClient, ApiConfig, HttpRequest, HttpResponse, HttpTransport, TransportFailure,
};
use std::cell::RefCell;
use std::collections::VecDeque;

pub const TEST_BASE_URL: &str = "http://test.local/api/v1/futureexploratorium";

/// Replays scripted replies in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, TransportFailure>>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, kind: TransportFailureKind, message: &str) -> Self {
        self.replies.borrow_mut().push_back(Err(TransportFailure::new(kind, message)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    pub fn last_url(&self) -> Option<String> {
        self.sent.borrow().last().map(|request| request.url.clone())
    }
}

impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        self.sent.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::new(TransportFailureKind::Other, "no scripted reply")))
    }
}

pub fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
    ApiClient::with_transport(ApiConfig::new(TEST_BASE_URL), transport)
}

pub fn url(path: &str) -> String {
    format!("{TEST_BASE_URL}{path}")
}
