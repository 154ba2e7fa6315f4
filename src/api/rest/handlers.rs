//! # REST Handlers
//!
//! Request handlers, shared state and the error-to-HTTP mapping.
//!
//! | Error | Status |
//! |-------|--------|
//! | `Validation`, `InvalidParameter` | 400 |
//! | `ExternalService` | 502 |
//! | `Timeout` | 504 |
//! | `Persistence`, `Internal` | 500 |

use crate::application::dto::{QuoteRequest, QuoteResponse};
use crate::application::error::ApplicationError;
use crate::application::services::metrics_service::INVALID_LAST_QUOTES_MESSAGE;
use crate::application::services::{MetricsService, QuoteService};
use crate::application::validation::ValidationErrors;
use crate::domain::MetricsResponse;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Quote orchestration.
    pub quote_service: QuoteService,
    /// Metrics aggregation.
    pub metrics_service: MetricsService,
}

impl AppState {
    /// Wraps the services for use as router state.
    #[must_use]
    pub fn new(quote_service: QuoteService, metrics_service: MetricsService) -> Arc<Self> {
        Arc::new(Self {
            quote_service,
            metrics_service,
        })
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short summary.
    pub error: String,
    /// Field-level messages, when there are any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorResponse {
    /// Creates an error body without details.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }

    /// Attaches field-level messages.
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// `GET /metrics` query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsParams {
    /// Raw bound; parsed by the metrics service.
    pub last_quotes: Option<String>,
}

impl MetricsParams {
    /// Picks the recognized parameters out of raw query pairs.
    ///
    /// A repeated `last_quotes` keeps its first value.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            last_quotes: pairs
                .into_iter()
                .find(|(key, _)| key == "last_quotes")
                .map(|(_, value)| value),
        }
    }
}

impl ApplicationError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::Validation(errors) => {
                ErrorResponse::new("Dados de entrada inválidos").with_details(errors.messages())
            }
            Self::InvalidParameter { message, .. } => ErrorResponse::new(message.clone()),
            Self::ExternalService(_) => {
                ErrorResponse::new("Falha ao consultar o serviço de cotação de frete")
            }
            Self::Timeout(_) => ErrorResponse::new("Tempo limite da requisição excedido"),
            Self::Persistence(_) => ErrorResponse::new("Falha ao acessar o banco de dados"),
            Self::Internal(_) => ErrorResponse::new("Erro interno do servidor"),
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_client_error() {
            debug!(status = status.as_u16(), error = %self, "request rejected");
        } else {
            error!(
                status = status.as_u16(),
                timeout = self.is_timeout(),
                error = %self,
                "request failed"
            );
        }
        (status, Json(self.to_error_response())).into_response()
    }
}

/// `POST /quote`
///
/// # Errors
///
/// See the status table in the module docs.
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, ApplicationError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "malformed quote request");
        ApplicationError::from(ValidationErrors::malformed_body())
    })?;

    let response = state.quote_service.create_quote(&request).await?;
    Ok(Json(response))
}

/// `GET /metrics`
///
/// # Errors
///
/// See the status table in the module docs.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<MetricsResponse>, ApplicationError> {
    let Query(pairs) = query.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "malformed metrics query");
        ApplicationError::invalid_parameter("last_quotes", INVALID_LAST_QUOTES_MESSAGE)
    })?;
    let params = MetricsParams::from_pairs(pairs);

    let metrics = state
        .metrics_service
        .get_metrics(params.last_quotes.as_deref())
        .await?;
    Ok(Json(metrics))
}

/// `GET /health`
#[allow(clippy::unused_async)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
