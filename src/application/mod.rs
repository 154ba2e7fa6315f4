//! # Application Layer
//!
//! Use cases of the freight quote service.
//!
//! - [`dto`]: request and response bodies
//! - [`validation`]: field-level request validation
//! - [`services`]: quote orchestration and metrics
//! - [`error`]: application error taxonomy

pub mod dto;
pub mod error;
pub mod services;
pub mod validation;

pub use error::{ApplicationError, ApplicationResult};
