//! Client code for crawlback.
//!
//! This crate provides the crawl index client, the byte-range record fetcher,
//! record splitting and the search controller that walks the crawl catalog
//! to recover archived pages.

pub mod error;
pub mod fetch;
pub mod http;
pub mod index;
pub mod record;
pub mod search;
pub mod target;

#[cfg(test)]
mod testing;

pub use error::{ArchiveError, Disposition};
pub use fetch::{ContentFetcher, RecordFetch};
pub use http::{HttpConfig, StatusPolicy};
pub use index::{ArchiveRecordLocator, IndexClient, IndexLookup};
pub use record::{CompoundRecord, SplitError};
pub use search::{Direction, Resolution, ResolveRequest, ResolvedPage, Resolver, RetryPolicy};
pub use target::{UrlError, validate_target};
