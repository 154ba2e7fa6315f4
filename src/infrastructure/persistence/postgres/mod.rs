//! # PostgreSQL Persistence
//!
//! sqlx-backed implementations and schema bootstrap.

pub mod quote_repository;
pub mod schema;

pub use quote_repository::PostgresQuoteRepository;
pub use schema::ensure_schema;
