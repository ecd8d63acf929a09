use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter};

use super::config::ApiConfig;
use super::dto::{
    AnalysisReceipt, BacktestRequest, ChartQuery, ChartSeries, ErrorDetail, HealthReport, MarketOverview,
    PerformanceReport, PerformanceSummary, RiskReport,
};
use super::http::{GlooTransport, HttpMethod, HttpRequest, HttpTransport, build_path_with_query, merge_headers};
use crate::domain::errors::{ApiError, ApiRequestError, ApiResult, ApiTransportError, GENERIC_REQUEST_FAILURE};
use crate::domain::logging::{LogComponent, LogLevel, get_logger};
use crate::log_debug;

/// Fixed paths of the dashboard API, relative to the base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumIter, AsRefStr)]
pub enum Endpoint {
    #[strum(serialize = "/core/health")]
    Health,
    #[strum(serialize = "/dashboard/market/overview")]
    MarketOverview,
    #[strum(serialize = "/dashboard/performance")]
    Performance,
    #[strum(serialize = "/dashboard/risk")]
    Risk,
    #[strum(serialize = "/dashboard/chart")]
    Chart,
    #[strum(serialize = "/core/analysis/comprehensive")]
    ComprehensiveAnalysis,
    #[strum(serialize = "/core/performance/summary")]
    PerformanceSummary,
}

impl Endpoint {
    pub fn path(&self) -> &str {
        self.as_ref()
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::ComprehensiveAnalysis => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }
}

/// Per-call overrides for [`ApiClient::request`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self { method: HttpMethod::Post, body: Some(body), headers: Vec::new() }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Replaces an earlier value for the same name, ignoring case.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }
}

/// Dashboard API client: one round trip per call, no retries, no caching.
pub struct ApiClient<T: HttpTransport = GlooTransport> {
    config: ApiConfig,
    transport: T,
}

impl ApiClient<GlooTransport> {
    /// Browser client against the resolved base URL.
    pub fn new() -> Self {
        Self::from_config(ApiConfig::from_env())
    }

    pub fn from_config(config: ApiConfig) -> Self {
        let transport = GlooTransport::new(config.timeout_ms);
        Self::with_transport(config, transport)
    }
}

impl Default for ApiClient<GlooTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `options` to `base_url + endpoint` and decode the JSON reply.
    ///
    /// Failures are logged with the endpoint, then returned unchanged.
    pub async fn request<R: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<R> {
        let result = self.execute(endpoint, options).await;
        if let Err(error) = &result {
            Self::log_failure(endpoint, error);
        }
        result
    }

    async fn execute<R: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<R> {
        let body = match &options.body {
            Some(value) => Some(serde_json::to_string(value).map_err(|e| ApiError::InvalidBody {
                endpoint: endpoint.to_string(),
                reason: format!("Failed to serialize body: {e}"),
            })?),
            None => None,
        };

        let request = HttpRequest {
            method: options.method,
            url: self.config.url_for(endpoint),
            headers: merge_headers(&self.config.default_headers, &options.headers),
            body,
        };
        log_debug!(LogComponent::Infrastructure("ApiClient"), "🌐 {} {}", request.method, request.url);

        let response = self.transport.send(request).await.map_err(|failure| ApiTransportError {
            endpoint: endpoint.to_string(),
            kind: failure.kind,
            message: failure.message,
        })?;

        if !response.is_success() {
            let message = serde_json::from_str::<ErrorDetail>(&response.body)
                .ok()
                .and_then(|detail| detail.message())
                .unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string());
            return Err(ApiRequestError { endpoint: endpoint.to_string(), status: response.status, message }.into());
        }

        // 204 and friends decode as JSON null.
        let text = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::InvalidBody {
            endpoint: endpoint.to_string(),
            reason: format!("Failed to parse JSON: {e}"),
        })
    }

    fn log_failure(endpoint: &str, error: &ApiError) {
        get_logger().log_with_metadata(
            LogLevel::Error,
            LogComponent::Infrastructure("ApiClient"),
            &format!("❌ API request failed for {endpoint}: {error}"),
            &format!("endpoint={endpoint}"),
        );
    }

    fn encode_body<B: Serialize>(endpoint: Endpoint, body: &B) -> ApiResult<Value> {
        serde_json::to_value(body).map_err(|e| {
            let error =
                ApiError::InvalidBody { endpoint: endpoint.path().to_string(), reason: format!("Failed to encode body: {e}") };
            Self::log_failure(endpoint.path(), &error);
            error
        })
    }

    async fn call<R: DeserializeOwned>(&self, endpoint: Endpoint, body: Option<Value>) -> ApiResult<R> {
        let options = match body {
            Some(body) => RequestOptions::post(body),
            None => RequestOptions::get(),
        };
        self.request(endpoint.path(), options.with_method(endpoint.method())).await
    }

    pub async fn health_check(&self) -> ApiResult<HealthReport> {
        self.call(Endpoint::Health, None).await
    }

    pub async fn get_market_overview(&self) -> ApiResult<MarketOverview> {
        self.call(Endpoint::MarketOverview, None).await
    }

    pub async fn get_performance_metrics(&self) -> ApiResult<PerformanceReport> {
        self.call(Endpoint::Performance, None).await
    }

    pub async fn get_risk_metrics(&self) -> ApiResult<RiskReport> {
        self.call(Endpoint::Risk, None).await
    }

    /// `ChartQuery::default()` asks for `ES=F`, `1d`, 100 points.
    pub async fn get_chart_data(&self, query: &ChartQuery) -> ApiResult<ChartSeries> {
        let path = build_path_with_query(
            Endpoint::Chart.path(),
            &[
                ("symbol", query.symbol.clone()),
                ("timeframe", query.timeframe.clone()),
                ("limit", query.limit.to_string()),
            ],
        );
        self.request(&path, RequestOptions::get().with_method(Endpoint::Chart.method())).await
    }

    /// Trigger a backtest over `symbols` between the two ISO dates.
    pub async fn run_backtest(
        &self,
        symbols: &[String],
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<AnalysisReceipt> {
        let endpoint = Endpoint::ComprehensiveAnalysis;
        let body = Self::encode_body(endpoint, &BacktestRequest::new(symbols, start_date, end_date))?;
        self.call(endpoint, Some(body)).await
    }

    pub async fn get_strategy_performance(&self) -> ApiResult<PerformanceSummary> {
        self.call(Endpoint::PerformanceSummary, None).await
    }
}
