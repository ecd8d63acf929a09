//! Use cases that connect the API client to the dashboard store.

pub mod sync;

pub use sync::DashboardSync;
