//! # Schema Bootstrap
//!
//! Create-if-absent DDL for the quote tables, applied once at startup.

use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};
use sqlx::PgPool;
use tracing::info;

/// Tables and indexes for quotes and offers.
///
/// `seq` orders quotes created within the same timestamp.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS quotes (
    id UUID PRIMARY KEY,
    zipcode VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    seq BIGSERIAL NOT NULL
);

CREATE TABLE IF NOT EXISTS quote_offers (
    id UUID PRIMARY KEY,
    quote_id UUID NOT NULL REFERENCES quotes(id) ON DELETE CASCADE,
    carrier_name VARCHAR(255) NOT NULL,
    service VARCHAR(255) NOT NULL,
    deadline_days INT NOT NULL,
    final_price DECIMAL(12,2) NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quote_offers_quote_id ON quote_offers(quote_id);
CREATE INDEX IF NOT EXISTS idx_quotes_created_at ON quotes(created_at DESC, seq DESC);
"#;

/// Applies [`SCHEMA`].
///
/// # Errors
///
/// Returns `RepositoryError::Query` if any statement fails.
pub async fn ensure_schema(pool: &PgPool) -> RepositoryResult<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| RepositoryError::query(format!("schema bootstrap failed: {e}")))?;
    info!("database schema ready");
    Ok(())
}
