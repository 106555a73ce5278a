//! Database module for measurement storage.
//!
//! Storage backends sit behind the repository traits so the HTTP layer never
//! sees which one is in use.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / seeding tool                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │  Postgres          Local     │
//!     │  (Diesel)       (in-memory)  │
//!     └──────────────────────────────┘
//! ```
//!
//! - `services`: High-level read functions used by handlers
//! - `repository`: Trait definitions and error types
//! - `repositories::postgres`: Postgres implementation with Diesel ORM
//! - `repositories::local`: In-memory implementation for tests and local development
//! - `config`, `repo_config`: connection settings from defaults, file and environment
//! - `factory`: Factory for creating repository instances

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use config::PostgresConfig;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use services::{health_check, list_depthseries, list_timeseries};

pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::{PoolStats, PostgresRepository};
pub use repository::{
    ErrorContext, FullRepository, MeasurementRepository, RepositoryError, RepositoryResult,
    SeedRepository,
};
