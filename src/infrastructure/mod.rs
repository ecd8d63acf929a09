//! Network access, configuration and browser services.

pub mod api_client;
pub mod config;
pub mod dto;
pub mod http;
pub mod services;

pub use api_client::{ApiClient, Endpoint, RequestOptions};
pub use config::{ApiConfig, DEFAULT_BASE_URL, resolve_base_url};
pub use dto::*;
pub use http::{GlooTransport, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportFailure};
