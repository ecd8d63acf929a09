use futures::future::{Either, select};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use web_sys::AbortController;

use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportFailure};
use crate::domain::errors::TransportFailureKind;
use crate::domain::logging::{LogComponent, get_logger};

/// Browser `fetch` transport built on gloo-net
#[derive(Debug, Clone, Default)]
pub struct GlooTransport {
    timeout_ms: Option<u32>,
}

impl GlooTransport {
    pub fn new(timeout_ms: Option<u32>) -> Self {
        Self { timeout_ms }
    }

    fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
        match method {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
            HttpMethod::Put => Request::put(url),
            HttpMethod::Delete => Request::delete(url),
        }
    }

    fn classify(error: gloo_net::Error) -> TransportFailure {
        match error {
            gloo_net::Error::JsError(js) if js.name == "AbortError" => {
                TransportFailure::new(TransportFailureKind::Aborted, js.message)
            }
            // fetch rejects with a TypeError for DNS failures and refused connections.
            gloo_net::Error::JsError(js) => TransportFailure::new(TransportFailureKind::Connect, js.message),
            other => TransportFailure::new(TransportFailureKind::Other, other.to_string()),
        }
    }
}

impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(AbortController::signal);

        let mut builder = Self::builder(request.method, &request.url).abort_signal(signal.as_ref());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportFailure::new(TransportFailureKind::Other, format!("Failed to build request: {e}")))?;

        let fetch = Box::pin(prepared.send());
        let response = match self.timeout_ms {
            Some(ms) => match select(fetch, Box::pin(TimeoutFuture::new(ms))).await {
                Either::Left((result, _)) => result,
                Either::Right(_) => {
                    if let Some(controller) = &controller {
                        controller.abort();
                    }
                    get_logger().warn(
                        LogComponent::Infrastructure("GlooTransport"),
                        &format!("⏱️ {} {} timed out after {ms} ms", request.method, request.url),
                    );
                    return Err(TransportFailure::new(
                        TransportFailureKind::Timeout,
                        format!("no response within {ms} ms"),
                    ));
                }
            },
            None => fetch.await,
        }
        .map_err(Self::classify)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::classify)?;
        Ok(HttpResponse { status, body })
    }
}
