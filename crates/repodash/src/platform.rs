//! Platform-agnostic data model and adapter trait.
//!
//! This module defines the `RepositorySource` trait that the aggregator and the
//! session drive, together with the records it produces and the single error
//! type every adapter operation fails with.
//!
//! # Example
//!
//! ```ignore
//! use repodash::platform::{RepositorySource, ApiError};
//!
//! async fn first_page<S: RepositorySource>(source: &S) -> Result<(), ApiError> {
//!     let page = source.fetch_visible_repositories_page(1, 100).await?;
//!     for repo in page {
//!         println!("{}", repo.full_name);
//!     }
//!     Ok(())
//! }
//! ```

mod errors;
mod types;

pub use errors::{ApiError, Result};
pub use types::{Page, RepositoryRecord, RepositorySource, UserProfile, owner_segment};
