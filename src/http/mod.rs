//! HTTP client module
//!
//! Timeouts and user agent for the shared `reqwest::Client`. Requests
//! themselves are issued through an authenticated `Session`.

mod client;

pub use client::{HttpClientConfig, HttpClientConfigBuilder};
