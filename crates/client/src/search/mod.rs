//! Search across crawls for the capture of a URL closest to a target month.
//!
//! ### Algorithm
//!
//! 1. Resolve the starting catalog position (match override, exact month,
//!    nearest newer crawl, offset, clamp).
//! 2. At each position: index lookup, byte-range fetch, record split.
//! 3. A complete record ends the search. Missing, malformed or unexpected
//!    answers move the cursor one crawl in the search direction.
//! 4. Transient statuses and network faults retry the same crawl after a
//!    wait, each bounded by its own limit, then move on.
//! 5. Leaving the catalog ends the search with `Resolution::NotFound`.
//!
//! A resolution is one sequential future with no internal cancellation;
//! wrap it in `tokio::time::timeout` to bound its duration.

pub mod retry;

pub use retry::{RetryPolicy, RetryState};

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::Disposition;
use crate::fetch::{ContentFetcher, RecordFetch};
use crate::http::HttpConfig;
use crate::index::{ArchiveRecordLocator, IndexClient, IndexLookup};
use crate::record;
use crate::ArchiveError;
use crawlback_core::catalog::parse_target;
use crawlback_core::{AppConfig, CatalogEntry, Error, MatchTable, MonthKey, MonthResolver, SnapshotCatalog};

/// Which way through time the search moves after a miss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Toward older crawls (higher catalog positions).
    #[default]
    Backward,
    /// Toward newer crawls (lower catalog positions).
    Forward,
}

impl Direction {
    pub fn from_backward(backward: bool) -> Self {
        if backward { Direction::Backward } else { Direction::Forward }
    }
}

/// Position in the catalog plus the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCursor {
    position: usize,
    direction: Direction,
    len: usize,
}

impl SearchCursor {
    pub fn new(position: usize, direction: Direction, len: usize) -> Self {
        Self { position, direction, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Step one crawl; `false` once the next step would leave the catalog.
    pub fn advance(&mut self) -> bool {
        let next = match self.direction {
            Direction::Backward => self.position.checked_add(1).filter(|p| *p < self.len),
            Direction::Forward => self.position.checked_sub(1),
        };
        match next {
            Some(position) => {
                self.position = position;
                true
            }
            None => false,
        }
    }
}

/// Parameters of one resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub url: &'a str,
    pub target: Option<MonthKey>,
    pub direction: Direction,
    pub matches: Option<&'a MatchTable>,
}

impl<'a> ResolveRequest<'a> {
    /// Search for `url` starting at the newest crawl, moving backward.
    pub fn new(url: &'a str) -> Self {
        Self { url, target: None, direction: Direction::Backward, matches: None }
    }

    pub fn target(mut self, target: Option<MonthKey>) -> Self {
        self.target = target;
        self
    }

    /// Set the target from loose year/month strings; unparseable input means
    /// no target.
    pub fn year_month(mut self, year: Option<&str>, month: Option<&str>) -> Self {
        self.target = parse_target(year, month);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn matches(mut self, matches: Option<&'a MatchTable>) -> Self {
        self.matches = matches;
        self
    }
}

/// A page recovered from the archive.
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    /// Captured HTTP body, decoded.
    pub content: String,
    /// Catalog month of the crawl that held the capture.
    pub resolved_month: MonthKey,
    /// Index-set of that crawl.
    pub index_set: String,
    /// When the page was captured.
    pub captured_at: DateTime<Utc>,
    /// Captured HTTP status line and headers.
    pub http_header: String,
    /// Archive metadata block of the record.
    pub warc_header: String,
    /// Detected character encoding of the record.
    pub encoding: &'static str,
    pub locator: ArchiveRecordLocator,
}

/// Result of a search.
#[derive(Debug, Clone)]
pub enum Resolution {
    Found(Box<ResolvedPage>),
    /// No crawl in the search direction holds a usable capture.
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn into_page(self) -> Option<ResolvedPage> {
        match self {
            Resolution::Found(page) => Some(*page),
            Resolution::NotFound => None,
        }
    }
}

/// Searches the catalog for archived copies of pages.
///
/// Holds only read-only state, so one resolver can serve concurrent
/// resolutions of different URLs.
#[derive(Debug, Clone)]
pub struct Resolver<L = IndexClient, F = ContentFetcher> {
    catalog: Arc<SnapshotCatalog>,
    index: L,
    fetcher: F,
    policy: RetryPolicy,
    month_offset: i32,
}

impl Resolver<IndexClient, ContentFetcher> {
    /// Validate configuration and wire the HTTP index client and fetcher.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        config.validate()?;
        let http = HttpConfig::from(config);
        Ok(Self::new(
            Arc::new(config.snapshot_catalog()?),
            IndexClient::new(&http)?,
            ContentFetcher::new(&http)?,
            RetryPolicy::from(config),
            config.month_offset,
        ))
    }
}

impl<L: IndexLookup, F: RecordFetch> Resolver<L, F> {
    pub fn new(catalog: Arc<SnapshotCatalog>, index: L, fetcher: F, policy: RetryPolicy, month_offset: i32) -> Self {
        Self { catalog, index, fetcher, policy, month_offset }
    }

    pub fn catalog(&self) -> &SnapshotCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Catalog position a request would start searching at.
    pub fn start_position(&self, request: &ResolveRequest<'_>) -> usize {
        MonthResolver::new(&self.catalog, self.month_offset).start_position(
            request.url,
            request.target,
            request.matches,
        )
    }

    /// Search for the page, returning the first complete capture.
    pub async fn resolve(&self, request: &ResolveRequest<'_>) -> Resolution {
        let url = request.url;
        let start = self.start_position(request);
        let mut cursor = SearchCursor::new(start, request.direction, self.catalog.len());
        let mut retry = RetryState::default();

        tracing::debug!(url, start, direction = ?request.direction, "starting archive search");

        while let Some(entry) = self.catalog.entry(cursor.position()) {
            match self.attempt(url, entry).await {
                Ok(page) => {
                    tracing::info!(
                        url,
                        month = %page.resolved_month,
                        index_set = %page.index_set,
                        captured_at = %page.captured_at,
                        "resolved archived page"
                    );
                    return Resolution::Found(Box::new(page));
                }
                Err(err) => {
                    let disposition = err.disposition();
                    if retry.register(disposition, &self.policy) {
                        let (attempt, max) = match disposition {
                            Disposition::RetryFault => (retry.faults, self.policy.max_fault_retry),
                            _ => (retry.transient, self.policy.max_retry),
                        };
                        tracing::warn!(
                            "{} for {} in {}, waiting {:?}... (retry attempt {}/{})",
                            err,
                            url,
                            entry.index_set,
                            self.policy.wait,
                            attempt,
                            max
                        );
                        tokio::time::sleep(self.policy.wait).await;
                        continue;
                    }

                    match err {
                        ArchiveError::UnexpectedStatus(status) => {
                            tracing::warn!("unexpected status {} from {}, skipping crawl", status, entry.index_set)
                        }
                        ArchiveError::Transient(_) | ArchiveError::Fault(_) => {
                            tracing::warn!("giving up on {} for {}: {}", entry.index_set, url, err)
                        }
                        _ => tracing::debug!("{} not usable in {}: {}", url, entry.index_set, err),
                    }
                }
            }

            retry.reset();
            if !cursor.advance() {
                break;
            }
        }

        tracing::debug!(url, "no capture in any crawl");
        Resolution::NotFound
    }

    async fn attempt(&self, url: &str, entry: &CatalogEntry) -> Result<ResolvedPage, ArchiveError> {
        let locator = self.index.lookup(url, &entry.index_set).await?;
        let raw = self.fetcher.fetch(&locator).await?;
        let record = record::split(&raw)?;

        Ok(ResolvedPage {
            content: record.body,
            resolved_month: entry.month,
            index_set: entry.index_set.clone(),
            captured_at: locator.captured_at,
            http_header: record.http_header,
            warc_header: record.warc_header,
            encoding: record.encoding,
            locator,
        })
    }
}
