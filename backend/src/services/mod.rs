//! Service layer: request-independent logic shared by the HTTP handlers and
//! the seeding tool.
//!
//! Nothing in here touches axum types, so each piece is unit-testable on its own.

pub mod csv_export;
pub mod query_params;
pub mod route_match;
pub mod seed;

pub use csv_export::{depthseries_to_csv, CSV_FILENAME};
pub use query_params::{QueryParamValidator, ValidatedParams, ValidationError};
pub use route_match::{closest_match, similarity_ratio, SUGGESTION_CUTOFF};
pub use seed::{seed_repository, SeedSummary};
