//! # Measurements API
//!
//! Read-only HTTP API over two measurement tables: time series
//! (timestamp → value) and depth series (depth → value).
//!
//! ## Features
//!
//! - **Filtering**: validated `date` and `float` query parameters with inclusive bounds
//! - **Distinct depths**: one non-null depth series row per depth
//! - **CSV export**: depth series download as an attachment
//! - **Error envelopes**: uniform `{status, message}` JSON bodies, with route
//!   suggestions on 404
//! - **Storage**: Postgres through Diesel, or an in-memory store for tests
//!
//! ## Architecture
//!
//! - [`api`]: Row types and their serialized shapes
//! - [`db`]: Repository pattern, configuration and persistence layer
//! - [`services`]: Query validation, CSV export, route suggestions, seeding
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route paths, accepted parameters and filter descriptors

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
