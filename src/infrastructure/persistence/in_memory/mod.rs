//! # In-Memory Repositories
//!
//! In-memory implementations for testing without database dependencies.
//!
//! - [`InMemoryQuoteRepository`]: quote, offer and metrics storage
//!
//! Storage sits behind `Arc<tokio::sync::RwLock<_>>`, so clones share state.

pub mod quote_repository;

pub use quote_repository::InMemoryQuoteRepository;
