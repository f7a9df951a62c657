//! PrimeVue MCP: read-only HTTP query service for component metadata and
//! design tokens.
//!
//! A single pre-built JSON document is loaded lazily on the first request
//! and served through a handful of list, lookup and search endpoints.
//!
//! - **Dataset store** (`data`): lazily-loaded, immutable view of the file.
//! - **Records** (`record`): typed accessors over open component records.
//! - **Queries** (`query`): pure filter/search operations behind each endpoint.
//! - **Server** (`server`): axum router, handlers and bootstrap.

pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod record;
pub mod server;
