//! Paginated fetcher
//!
//! Drives one top-level fetch: build the session, request the first page with
//! the query parameters, then follow `links.next` cursors until they run out.
//! Pages are produced lazily as a stream; nothing is requested until the
//! stream is polled.

use super::page::Page;
use crate::auth::{Authenticate, Session};
use crate::error::{Error, Result};
use crate::provider::{build_url, Provider};
use crate::types::{query_pairs, QueryParams, Resource};
use futures::{Stream, TryStreamExt};
use reqwest::{Response, StatusCode};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lazily fetched pages, in cursor-following order
pub type PageStream = Pin<Box<dyn Stream<Item = Result<Page>> + Send>>;

/// Paging behaviour of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Follow `links.next` cursors; `false` stops after the first page
    pub paging: bool,
    /// Delay inserted before each cursor request
    pub rate_limit: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            paging: true,
            rate_limit: Duration::ZERO,
        }
    }
}

impl FetchOptions {
    /// Create fetch options with defaults (paging on, no delay)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether cursors are followed
    #[must_use]
    pub fn paging(mut self, paging: bool) -> Self {
        self.paging = paging;
        self
    }

    /// Set the delay between page requests
    #[must_use]
    pub fn rate_limit(mut self, delay: Duration) -> Self {
        self.rate_limit = delay;
        self
    }

    /// Set the delay between page requests, in whole seconds
    #[must_use]
    pub fn rate_limit_secs(self, seconds: u64) -> Self {
        self.rate_limit(Duration::from_secs(seconds))
    }
}

/// Everything needed to fetch one resource from one provider
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Provider to query
    pub provider: Provider,
    /// Resource endpoint
    pub resource: Resource,
    /// Query parameters for the first request
    pub params: QueryParams,
    /// Paging behaviour
    pub options: FetchOptions,
}

impl PageRequest {
    /// Create a request with no parameters and default options
    pub fn new(provider: Provider, resource: Resource) -> Self {
        Self {
            provider,
            resource,
            params: QueryParams::new(),
            options: FetchOptions::default(),
        }
    }

    /// Set the query parameters
    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Set the fetch options
    #[must_use]
    pub fn options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }
}

/// Where the fetch stands between polls
#[derive(Debug)]
enum FetchState {
    /// Nothing requested yet
    Init,
    /// A cursor to request next
    FetchingNext(String),
    /// Exhausted, stopped on a non-200, or failed
    Done,
}

struct Fetcher {
    authenticator: Arc<dyn Authenticate>,
    request: PageRequest,
    session: Option<Session>,
    state: FetchState,
    requests: usize,
    pages: usize,
    finished: bool,
}

impl Fetcher {
    fn new(authenticator: Arc<dyn Authenticate>, request: PageRequest) -> Self {
        Self {
            authenticator,
            request,
            session: None,
            state: FetchState::Init,
            requests: 0,
            pages: 0,
            finished: false,
        }
    }

    /// Produce the next non-empty page, or `None` once the fetch is over
    async fn next_page(&mut self) -> Option<Result<Page>> {
        let resource = self.request.resource;

        loop {
            // Any early return below leaves the fetch in `Done`
            let (url, query) = match std::mem::replace(&mut self.state, FetchState::Done) {
                FetchState::Init => {
                    info!(
                        "Fetching {} from {}",
                        resource,
                        self.request.provider.label()
                    );
                    match self.authenticator.session(&self.request.provider).await {
                        Ok(session) => self.session = Some(session),
                        Err(e) => return Some(Err(e)),
                    }
                    (
                        build_url(&self.request.provider, resource),
                        query_pairs(&self.request.params),
                    )
                }
                FetchState::FetchingNext(url) => {
                    let delay = self.request.options.rate_limit;
                    if !delay.is_zero() {
                        debug!("Waiting {:?} before next page", delay);
                        tokio::time::sleep(delay).await;
                    }
                    (url, Vec::new())
                }
                FetchState::Done => {
                    self.finish();
                    return None;
                }
            };

            let session = self.session.as_ref()?;
            let response = match session.get(&url, &query).await {
                Ok(response) => response,
                Err(e) => return Some(Err(e)),
            };
            self.requests += 1;

            if response.status() != StatusCode::OK {
                describe(response).await;
                self.finish();
                return None;
            }

            let page = match read_page(response, &url).await {
                Ok(page) => page,
                Err(e) => return Some(Err(e)),
            };

            if self.request.options.paging {
                if let Some(next) = page.next_link() {
                    self.state = FetchState::FetchingNext(next.to_string());
                }
            }

            let count = page.payload_len(resource);
            debug!("Got payload with {} {}", count, resource);

            if count > 0 {
                self.pages += 1;
                return Some(Ok(page));
            }

            if matches!(self.state, FetchState::Done) {
                self.finish();
                return None;
            }
        }
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        info!(
            "Finished {} from {}: {} non-empty pages in {} requests",
            self.request.resource,
            self.request.provider.label(),
            self.pages,
            self.requests
        );
    }
}

/// Read and parse a 200 response body
async fn read_page(response: Response, url: &str) -> Result<Page> {
    let body = response.text().await.map_err(Error::Http)?;
    let value = serde_json::from_str(&body).map_err(|e| Error::decode(url, e.to_string()))?;
    Ok(Page::new(value))
}

/// Log details about a failed response
async fn describe(response: Response) {
    let url = response.url().to_string();
    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| format!("{k}: {}", v.to_str().unwrap_or("<binary>")))
        .collect::<Vec<_>>()
        .join("\n");
    let body = response.text().await.unwrap_or_default();

    warn!(
        "Requested {}, Response Code: {}\nResponse Headers:\n{}\n{}",
        url,
        status.as_u16(),
        headers,
        body
    );
}

/// Fetch the pages of one resource as a lazy stream.
///
/// Only pages with a non-empty payload are yielded, but cursors on empty
/// pages are still followed. A non-200 response is logged and ends the
/// stream without an error item. Session, transport and decode failures are
/// yielded as an error, after which the stream ends.
pub fn fetch_pages(authenticator: Arc<dyn Authenticate>, request: PageRequest) -> PageStream {
    let fetcher = Fetcher::new(authenticator, request);
    Box::pin(futures::stream::unfold(fetcher, |mut fetcher| async move {
        fetcher.next_page().await.map(|item| (item, fetcher))
    }))
}

/// Drain a page stream into a vector
pub async fn collect_pages(stream: PageStream) -> Result<Vec<Page>> {
    stream.try_collect().await
}
