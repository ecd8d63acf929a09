//! Bridges from the store to Leptos components and JavaScript hosts.

pub mod signals;
pub mod wasm_api;

pub use signals::{DashboardSignals, provide_dashboard, use_dashboard};
pub use wasm_api::DashboardApi;
