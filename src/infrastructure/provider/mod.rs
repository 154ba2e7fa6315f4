//! # Freight Provider
//!
//! Integration with the external freight-quoting service.
//!
//! - [`traits`]: the [`FreightProvider`] port
//! - [`frete_rapido`]: Frete Rápido adapter and wire types
//! - [`http_client`]: shared JSON-over-HTTP helper
//! - [`error`]: [`ProviderError`]

pub mod error;
pub mod frete_rapido;
pub mod http_client;
pub mod traits;

pub use error::{ProviderError, ProviderResult};
pub use frete_rapido::FreteRapidoClient;
pub use traits::{FreightProvider, ProviderOffer};
