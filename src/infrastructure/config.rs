use once_cell::sync::OnceCell;

/// Backend used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1/futureexploratorium";
/// Name of the build-time (and native runtime) base URL override.
pub const BASE_URL_ENV: &str = "MARKET_PULSE_API_URL";
pub const DEFAULT_TIMEOUT_MS: u32 = 30_000;

static BASE_URL: OnceCell<String> = OnceCell::new();

/// Base URL for the dashboard API, resolved once per process.
pub fn resolve_base_url() -> &'static str {
    BASE_URL.get_or_init(|| pick_base_url(option_env!("MARKET_PULSE_API_URL"), runtime_override()))
}

/// First non-blank override wins, build-time before runtime.
pub fn pick_base_url(compile_time: Option<&str>, runtime: Option<String>) -> String {
    compile_time
        .map(str::to_string)
        .into_iter()
        .chain(runtime)
        .find(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_override() -> Option<String> {
    std::env::var(BASE_URL_ENV).ok()
}

#[cfg(target_arch = "wasm32")]
fn runtime_override() -> Option<String> {
    None
}

/// Connection settings for [`crate::infrastructure::ApiClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: Option<u32>,
    /// Applied to every request; caller headers still win.
    pub default_headers: Vec<(String, String)>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            default_headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    pub fn from_env() -> Self {
        Self::new(resolve_base_url())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `None` disables the transport timeout.
    pub fn with_timeout(mut self, timeout_ms: Option<u32>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.default_headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.default_headers.push((name, value.into()));
        self
    }

    /// Join the base URL and an endpoint path with exactly one `/`.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
