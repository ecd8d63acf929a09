#![cfg(target_arch = "wasm32")]

use market_pulse_client::domain::errors::TransportFailureKind;
use market_pulse_client::domain::logging::{LogComponent, LogLevel, Logger};
use market_pulse_client::infrastructure::services::ConsoleLogger;
use market_pulse_client::infrastructure::{
    ApiClient, ApiConfig, GlooTransport, HttpMethod, HttpRequest, HttpTransport,
};
use wasm_bindgen_test::*;
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn unreachable_request() -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url: "http://127.0.0.1:9/core/health".to_string(),
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: None,
    }
}

#[wasm_bindgen_test]
async fn refused_connection_is_a_transport_failure() {
    let transport = GlooTransport::new(Some(5_000));

    let failure = transport.send(unreachable_request()).await.unwrap_err();

    assert!(matches!(failure.kind, TransportFailureKind::Connect | TransportFailureKind::Timeout));
}

#[wasm_bindgen_test]
async fn client_reports_unreachable_backend_as_transport_error() {
    let api = ApiClient::from_config(ApiConfig::new("http://127.0.0.1:9/api").with_timeout(Some(5_000)));

    let error = api.health_check().await.unwrap_err();

    assert!(error.is_transport());
    assert_eq!(error.endpoint(), "/core/health");
}

#[wasm_bindgen_test]
fn console_logger_writes_without_panicking() {
    let logger = ConsoleLogger::new_development();
    logger.info(LogComponent::Infrastructure("Test"), "console logger smoke test");
    logger.log_with_metadata(LogLevel::Error, LogComponent::Infrastructure("Test"), "boom", "endpoint=/x");
}
