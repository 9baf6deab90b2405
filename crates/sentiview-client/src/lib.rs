//! Typed HTTP client for the external sentiment inference API.
//!
//! The API exposes four route groups (`/analysis`, `/statistics`, `/reports`
//! and `/dataset`) whose authoritative shapes are defined by the service
//! itself; the types in [`types`] mirror them. [`ApiClient`] wraps `reqwest`
//! with standard JSON headers, fixed timeouts, a single automatic retry on
//! transient failures and an in-memory TTL cache for single-comment analysis.

mod analysis;
mod cache;
mod client;
mod dataset;
mod error;
mod reports;
mod retry;
mod statistics;
pub mod types;

pub use cache::TtlCache;
pub use client::ApiClient;
pub use error::ApiClientError;
