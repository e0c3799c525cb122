// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # MDS Provider Client
//!
//! An async client for the Mobility Data Specification (MDS) Provider API,
//! plus SQL generation for loading fetched records into Postgres.
//!
//! ## Features
//!
//! - **Two Auth Modes**: static provider tokens, OAuth2 client credentials
//! - **Version Negotiation**: versioned `Accept` media type, per-version time encoding
//! - **Cursor Pagination**: lazy page streams that follow `links.next`
//! - **Provider Registry**: YAML file of known providers
//! - **SQL Loading**: `INSERT ... SELECT ... ON CONFLICT` from staging tables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use mds_client::client::{ProviderClient, StatusChangesQuery};
//! use mds_client::provider::load_registry;
//!
//! #[tokio::main]
//! async fn main() -> mds_client::Result<()> {
//!     let registry = load_registry("providers.yaml")?;
//!     let client = ProviderClient::builder()
//!         .provider(registry.get("lime")?.clone())
//!         .version("0.3.0")
//!         .build()?;
//!
//!     let mut pages = client.status_changes(&StatusChangesQuery::new().start_time(1_533_081_600_000))?;
//!     while let Some(page) = pages.try_next().await? {
//!         // Process page
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      ProviderClient                      │
//! │  status_changes(query) → PageStream   trips(query) → ... │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────┬──────────────────────┐
//! │   Provider   │       Auth         │     Pagination       │
//! ├──────────────┼────────────────────┼──────────────────────┤
//! │ Registry     │ Static token       │ links.next cursors   │
//! │ URL builder  │ OAuth2 credentials │ Empty page skipping  │
//! │              │ Accept media type  │ Rate limit delay     │
//! └──────────────┴────────────────────┴──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// MDS version negotiation
pub mod version;

/// Provider descriptors and registry
pub mod provider;

/// Session construction and authentication
pub mod auth;

/// HTTP client configuration
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Provider API client and resource queries
pub mod client;

/// SQL statement generation
pub mod sql;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{ProviderClient, StatusChangesQuery, TripsQuery};
pub use pagination::{Page, PageStream};
pub use provider::{load_registry, Provider, ProviderRegistry};
pub use version::Version;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
