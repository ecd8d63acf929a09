mod common;

use common::{ScriptedTransport, client, url};
use futures::executor::block_on;
use insta::assert_json_snapshot;
use market_pulse_client::domain::errors::{ApiError, GENERIC_REQUEST_FAILURE, TransportFailureKind};
use market_pulse_client::infrastructure::{ChartQuery, Endpoint, HttpMethod, RequestOptions};
use serde_json::{Value, json};

#[test]
fn success_body_is_returned_unchanged() {
    let body = r#"{"status":"healthy","nested":{"values":[1,2,3]},"flag":true}"#;
    let api = client(ScriptedTransport::new().reply(200, body));

    let value: Value = block_on(api.request("/core/health", RequestOptions::get())).unwrap();

    assert_eq!(value, serde_json::from_str::<Value>(body).unwrap());
    assert_eq!(api.transport().last_url().as_deref(), Some(url("/core/health").as_str()));
}

#[test]
fn error_status_uses_server_detail() {
    let api = client(ScriptedTransport::new().reply(422, r#"{"detail":"Invalid date range"}"#));

    let error = block_on(api.request::<Value>("/dashboard/risk", RequestOptions::get())).unwrap_err();

    assert_eq!(error.status(), Some(422));
    assert_eq!(error.endpoint(), "/dashboard/risk");
    assert_eq!(error.user_message(), "Invalid date range");
    assert!(!error.is_transport());
}

#[test]
fn error_status_without_detail_uses_generic_message() {
    let api = client(
        ScriptedTransport::new()
            .reply(500, "Internal Server Error")
            .reply(404, "{}")
            .reply(503, r#"{"detail":{"code":7}}"#),
    );

    for expected_status in [500, 404, 503] {
        let error = block_on(api.request::<Value>("/dashboard/performance", RequestOptions::get())).unwrap_err();
        assert_eq!(error.status(), Some(expected_status));
        assert_eq!(error.user_message(), GENERIC_REQUEST_FAILURE);
    }
}

#[test]
fn transport_failure_is_distinct_and_not_retried() {
    let api = client(
        ScriptedTransport::new()
            .fail(TransportFailureKind::Connect, "connection refused")
            .reply(200, "{}"),
    );

    let error = block_on(api.health_check()).unwrap_err();

    match &error {
        ApiError::Transport(transport) => {
            assert_eq!(transport.kind, TransportFailureKind::Connect);
            assert_eq!(transport.endpoint, "/core/health");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(error.is_transport());
    assert_eq!(error.status(), None);
    assert_eq!(api.transport().requests().len(), 1);
}

#[test]
fn success_body_that_is_not_json_is_invalid() {
    let api = client(ScriptedTransport::new().reply(200, "<html>oops</html>"));

    let error = block_on(api.get_market_overview()).unwrap_err();

    assert!(matches!(error, ApiError::InvalidBody { .. }));
    assert_eq!(error.endpoint(), "/dashboard/market/overview");
}

#[test]
fn empty_success_body_decodes_as_null() {
    let api = client(ScriptedTransport::new().reply(204, ""));

    let value: Value = block_on(api.request("/core/health", RequestOptions::get())).unwrap();

    assert_eq!(value, Value::Null);
}

#[test]
fn default_chart_query_targets_es_daily() {
    let api = client(ScriptedTransport::new().reply(200, r#"{"symbol":"ES=F","data":[]}"#));

    let series = block_on(api.get_chart_data(&ChartQuery::default())).unwrap();

    assert_eq!(series.symbol, "ES=F");
    assert_eq!(
        api.transport().last_url().unwrap(),
        url("/dashboard/chart?symbol=ES=F&timeframe=1d&limit=100")
    );
}

#[test]
fn chart_query_overrides_reach_the_url() {
    let api = client(ScriptedTransport::new().reply(200, "{}"));

    block_on(api.get_chart_data(&ChartQuery::for_symbol("NQ=F").with_timeframe("1h").with_limit(24))).unwrap();

    assert_eq!(
        api.transport().last_url().unwrap(),
        url("/dashboard/chart?symbol=NQ=F&timeframe=1h&limit=24")
    );
}

#[test]
fn convenience_calls_hit_their_endpoints() {
    let api = client(
        ScriptedTransport::new()
            .reply(200, r#"{"status":"healthy","score":98.5,"uptime":"3h 12m"}"#)
            .reply(200, r#"{"data":{"ES=F":{"price":5120.25}}}"#)
            .reply(200, r#"{"pnl":1500.0,"sharpe":1.4}"#)
            .reply(200, r#"{"var_95":-2.1,"volatility":0.18}"#)
            .reply(200, r#"{"total_return":0.12,"total_trades":42}"#),
    );

    let health = block_on(api.health_check()).unwrap();
    let market = block_on(api.get_market_overview()).unwrap();
    let performance = block_on(api.get_performance_metrics()).unwrap();
    let risk = block_on(api.get_risk_metrics()).unwrap();
    let summary = block_on(api.get_strategy_performance()).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(market.to_market_data()["ES"].price, 5120.25);
    assert_eq!(performance.pnl, 1500.0);
    assert_eq!(risk.var_95, -2.1);
    assert_eq!(summary.total_trades, 42);

    let sent = api.transport().requests();
    let paths: Vec<String> = sent.iter().map(|request| request.url.clone()).collect();
    assert_eq!(
        paths,
        vec![
            url(Endpoint::Health.path()),
            url(Endpoint::MarketOverview.path()),
            url(Endpoint::Performance.path()),
            url(Endpoint::Risk.path()),
            url(Endpoint::PerformanceSummary.path()),
        ]
    );
    assert!(sent.iter().all(|request| request.method == HttpMethod::Get && request.body.is_none()));
}

#[test]
fn every_request_carries_json_content_type() {
    let api = client(ScriptedTransport::new().reply(200, "{}"));

    block_on(api.request::<Value>("/core/health", RequestOptions::get())).unwrap();

    let request = &api.transport().requests()[0];
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[test]
fn caller_headers_override_defaults() {
    let api = client(ScriptedTransport::new().reply(200, "{}"));
    let options = RequestOptions::get()
        .with_header("Content-Type", "text/plain")
        .with_header("X-Request-Id", "abc-123");

    block_on(api.request::<Value>("/core/health", options)).unwrap();

    let request = &api.transport().requests()[0];
    assert_eq!(request.header("Content-Type"), Some("text/plain"));
    assert_eq!(request.header("X-Request-Id"), Some("abc-123"));
    let content_types = request.headers.iter().filter(|(name, _)| name.eq_ignore_ascii_case("content-type"));
    assert_eq!(content_types.count(), 1);
}

#[test]
fn backtest_posts_analysis_request() {
    let api = client(ScriptedTransport::new().reply(200, r#"{"analysis_id":"bt-1","status":"completed"}"#));
    let symbols = vec!["ES=F".to_string(), "NQ=F".to_string()];

    let receipt = block_on(api.run_backtest(&symbols, "2024-01-01", "2024-06-30")).unwrap();

    assert_eq!(receipt.analysis_id.as_deref(), Some("bt-1"));
    let request = &api.transport().requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, url("/core/analysis/comprehensive"));

    let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["analysis_types"], json!(["backtesting"]));
    assert_json_snapshot!(body, @r###"
    {
      "analysis_types": [
        "backtesting"
      ],
      "end_date": "2024-06-30",
      "start_date": "2024-01-01",
      "symbols": [
        "ES=F",
        "NQ=F"
      ]
    }
    "###);
}

#[test]
fn unknown_response_fields_are_kept() {
    let api = client(ScriptedTransport::new().reply(200, r#"{"status":"healthy","region":"eu-west"}"#));

    let health = block_on(api.health_check()).unwrap();

    assert_eq!(health.extra.get("region"), Some(&json!("eu-west")));
}

#[test]
fn repeated_caller_header_sends_one_value() {
    let api = client(ScriptedTransport::new().reply(200, "{}"));
    let options = RequestOptions::get()
        .with_header("X-Request-Id", "first")
        .with_header("x-request-id", "second");

    block_on(api.request::<Value>("/core/health", options)).unwrap();

    let request = &api.transport().requests()[0];
    assert_eq!(request.header("X-Request-Id"), Some("second"));
    let ids = request.headers.iter().filter(|(name, _)| name.eq_ignore_ascii_case("x-request-id"));
    assert_eq!(ids.count(), 1);
}
