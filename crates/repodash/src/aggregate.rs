//! Repository aggregation.
//!
//! Drives a paginated listing to exhaustion, deduplicates the result by id and
//! tags each record with its ownership relative to a target username.
//!
//! Aggregation is all-or-nothing: one failed page aborts the whole run and no
//! partial list is ever returned.

use std::collections::HashSet;
use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::platform::{self, ApiError, Page, RepositoryRecord, RepositorySource};

/// Largest page size GitHub accepts.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Upper bound on pages fetched in a single run.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Errors from an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// A page fetch failed; the run was aborted.
    #[error("Failed to fetch all user repositories: {0}")]
    Api(#[from] ApiError),

    /// The listing never returned an empty page within the cap.
    #[error(
        "Failed to fetch all user repositories: listing did not end within {max_pages} pages"
    )]
    PageLimitExceeded { max_pages: u32 },
}

impl AggregationError {
    /// HTTP status of the underlying failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AggregationError::Api(e) => e.status,
            AggregationError::PageLimitExceeded { .. } => None,
        }
    }
}

/// Pagination settings for an aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Records requested per page (1..=100).
    pub per_page: u32,
    /// Maximum pages fetched before giving up (at least 1).
    pub max_pages: u32,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl AggregateOptions {
    /// Create options, clamping both values into their valid ranges.
    pub fn new(per_page: u32, max_pages: u32) -> Self {
        Self {
            per_page: per_page.clamp(1, DEFAULT_PER_PAGE),
            max_pages: max_pages.max(1),
        }
    }
}

/// Fetch pages `1, 2, ...` until one comes back empty.
///
/// Pages are requested strictly one after another. The first error stops the
/// loop and is returned; records collected so far are discarded.
pub async fn collect_all<F, Fut>(
    mut fetch_page: F,
    options: &AggregateOptions,
) -> Result<Vec<RepositoryRecord>, AggregationError>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = platform::Result<Page>>,
{
    let mut records = Vec::new();

    for page in 1..=options.max_pages {
        let batch = fetch_page(page, options.per_page).await?;

        tracing::debug!(
            page,
            count = batch.len(),
            total_so_far = records.len() + batch.len(),
            "Fetched repository page"
        );

        if batch.is_empty() {
            return Ok(records);
        }
        records.extend(batch);
    }

    tracing::warn!(
        max_pages = options.max_pages,
        collected = records.len(),
        "Repository listing did not end within page limit"
    );
    Err(AggregationError::PageLimitExceeded {
        max_pages: options.max_pages,
    })
}

/// Keep the first record for every id, preserving order.
pub fn dedup_by_id(records: Vec<RepositoryRecord>) -> Vec<RepositoryRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|repo| seen.insert(repo.id))
        .collect()
}

/// Set `is_owner` on every record relative to `username`.
pub fn tag_ownership(records: Vec<RepositoryRecord>, username: &str) -> Vec<RepositoryRecord> {
    records
        .into_iter()
        .map(|repo| repo.with_ownership(username))
        .collect()
}

/// Every repository visible to the token, tagged for `username`.
///
/// Uses [`DEFAULT_PER_PAGE`] and [`DEFAULT_MAX_PAGES`].
pub async fn get_all_user_repositories<S>(
    source: &S,
    username: &str,
) -> Result<Vec<RepositoryRecord>, AggregationError>
where
    S: RepositorySource + ?Sized,
{
    get_all_user_repositories_with(source, username, &AggregateOptions::default()).await
}

/// [`get_all_user_repositories`] with explicit pagination settings.
pub async fn get_all_user_repositories_with<S>(
    source: &S,
    username: &str,
    options: &AggregateOptions,
) -> Result<Vec<RepositoryRecord>, AggregationError>
where
    S: RepositorySource + ?Sized,
{
    let raw = collect_all(
        |page, per_page| source.fetch_visible_repositories_page(page, per_page),
        options,
    )
    .await?;

    Ok(finish(raw, username))
}

/// Only the repositories `username` owns, from the per-user listing.
pub async fn get_all_owned_repositories<S>(
    source: &S,
    username: &str,
    options: &AggregateOptions,
) -> Result<Vec<RepositoryRecord>, AggregationError>
where
    S: RepositorySource + ?Sized,
{
    let raw = collect_all(
        |page, per_page| source.fetch_repositories_page(username, page, per_page),
        options,
    )
    .await?;

    Ok(finish(raw, username))
}

fn finish(raw: Vec<RepositoryRecord>, username: &str) -> Vec<RepositoryRecord> {
    let fetched = raw.len();
    let records = tag_ownership(dedup_by_id(raw), username);

    let breakdown = RepositoryBreakdown::from_records(&records);
    tracing::info!(
        username,
        fetched,
        total = breakdown.total,
        owned = breakdown.owned,
        contributed = breakdown.contributed,
        private = breakdown.private,
        owned_private = breakdown.owned_private,
        "Aggregated repositories"
    );

    records
}

/// Counts over an aggregated list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryBreakdown {
    pub total: usize,
    pub owned: usize,
    pub contributed: usize,
    pub private: usize,
    pub owned_private: usize,
}

impl RepositoryBreakdown {
    pub fn from_records(records: &[RepositoryRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, repo| {
            let owned = repo.is_owner == Some(true);
            acc.total += 1;
            if owned {
                acc.owned += 1;
            } else if repo.is_owner == Some(false) {
                acc.contributed += 1;
            }
            if repo.private {
                acc.private += 1;
                if owned {
                    acc.owned_private += 1;
                }
            }
            acc
        })
    }
}
