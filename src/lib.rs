//! Relational adapter for the Salesforce REST API.
//!
//! Application code describes queries with [`domain::query::SelectQuery`],
//! the [`soql`] compiler rewrites them into the remote query language, and
//! [`repository::rest::RestRepository`] executes them over a cached OAuth
//! session, materializing results as [`domain::row::Row`]s through a paging
//! [`cursor::QueryCursor`]. [`introspect`] maps remote object metadata back
//! into generated Rust model definitions.

pub mod auth;
pub mod client;
pub mod cursor;
pub mod domain;
pub mod introspect;
pub mod known_bugs;
pub mod models;
pub mod repository;
pub mod soql;

/// REST API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "62.0";
