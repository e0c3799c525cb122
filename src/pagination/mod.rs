//! Pagination module
//!
//! Follows MDS `links.next` cursors across pages of a resource.
//!
//! # Overview
//!
//! - `Page` - raw response body with payload and cursor accessors
//! - `fetch_pages` - lazy stream of non-empty pages for one provider/resource
//! - `FetchOptions` - paging on/off and the delay between page requests

mod fetcher;
mod page;

pub use fetcher::{collect_pages, fetch_pages, FetchOptions, PageRequest, PageStream};
pub use page::Page;
