//! Repository trait definitions for database operations.
//!
//! The HTTP layer only reads measurements, while the seeding tool only writes
//! them, so the two concerns live in separate traits:
//!
//! - [`error`]: Error types for repository operations
//! - [`measurements`]: Filtered reads of time series and depth series rows
//! - [`seed`]: Bulk inserts used by the seeding tool and tests
//!
//! # Convenience Trait Bound
//!
//! For code that needs both capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn reseed<R: FullRepository>(repo: &R, rows: &[NewTimeseries]) -> RepositoryResult<()> {
//!     repo.insert_timeseries(rows).await?;
//!     let all = repo.fetch_timeseries(&TimeseriesFilter::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod measurements;
pub mod seed;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use measurements::MeasurementRepository;
pub use seed::SeedRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both
/// [`MeasurementRepository`] and [`SeedRepository`].
pub trait FullRepository: MeasurementRepository + SeedRepository {}

impl<T> FullRepository for T where T: MeasurementRepository + SeedRepository {}
