//! # Infrastructure Layer
//!
//! Adapters to the outside world.
//!
//! - [`config`]: environment-driven configuration
//! - [`persistence`]: quote storage (PostgreSQL, in-memory)
//! - [`provider`]: freight simulation client
//! - [`telemetry`]: tracing subscriber setup

pub mod config;
pub mod persistence;
pub mod provider;
pub mod telemetry;
