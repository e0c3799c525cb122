//! Authentication module
//!
//! Supports: static provider tokens, OAuth2 client credentials
//!
//! The `SessionBuilder` picks the strategy from the provider's auth mode and
//! returns a `Session` that stamps every request with the bearer token and
//! the versioned MDS `Accept` header.

mod builder;
mod session;
mod types;

pub use builder::{Authenticate, SessionBuilder};
pub use session::Session;
pub use types::{AuthMode, CachedToken};

#[cfg(test)]
mod tests;
