//! # PostgreSQL Quote Repository
//!
//! PostgreSQL implementation of [`QuoteRepository`] using sqlx.
//!
//! Each write is its own statement on the pool; nothing here opens a
//! transaction across a quote and its offers.

use crate::domain::entities::{Offer, Quote};
use crate::domain::{CarrierMetrics, MetricsResponse};
use crate::infrastructure::persistence::postgres::schema;
use crate::infrastructure::persistence::traits::{
    QuoteRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::num::NonZeroU64;

/// Carrier aggregate over the selected quotes. `LIMIT NULL` means no limit.
const CARRIER_METRICS_SQL: &str = r#"
WITH selected_quotes AS (
    SELECT id FROM quotes ORDER BY created_at DESC, seq DESC LIMIT $1
)
SELECT
    o.carrier_name,
    COUNT(*)::bigint AS total_quotes,
    COALESCE(SUM(o.final_price), 0)::float8 AS total_freight,
    COALESCE(AVG(o.final_price), 0)::float8 AS average_freight
FROM quote_offers o
WHERE o.quote_id IN (SELECT id FROM selected_quotes)
GROUP BY o.carrier_name
ORDER BY o.carrier_name
"#;

/// Overall min/max over the selected quotes, zero when empty.
const PRICE_RANGE_SQL: &str = r#"
WITH selected_quotes AS (
    SELECT id FROM quotes ORDER BY created_at DESC, seq DESC LIMIT $1
)
SELECT
    COALESCE(MIN(o.final_price), 0)::float8,
    COALESCE(MAX(o.final_price), 0)::float8
FROM quote_offers o
WHERE o.quote_id IN (SELECT id FROM selected_quotes)
"#;

/// PostgreSQL implementation of [`QuoteRepository`].
///
/// # Examples
///
/// ```ignore
/// use sqlx::PgPool;
/// use freight_quote::infrastructure::persistence::postgres::PostgresQuoteRepository;
///
/// let pool = PgPool::connect("postgres://...").await?;
/// let repo = PostgresQuoteRepository::new(pool);
/// repo.ensure_schema().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresQuoteRepository {
    pool: PgPool,
}

impl PostgresQuoteRepository {
    /// Creates a new repository over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates tables and indexes if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Query` if the DDL fails.
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        schema::ensure_schema(&self.pool).await
    }
}

#[async_trait]
impl QuoteRepository for PostgresQuoteRepository {
    async fn create_quote(&self, quote: &Quote) -> RepositoryResult<()> {
        let created_at: DateTime<Utc> = quote.created_at().into();

        sqlx::query(
            r#"
            INSERT INTO quotes (id, zipcode, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(quote.id().as_uuid())
        .bind(quote.zipcode().as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Quote", quote.id().to_string()))?;

        Ok(())
    }

    async fn create_offer(&self, offer: &Offer) -> RepositoryResult<()> {
        let deadline_days = i32::try_from(offer.deadline_days()).unwrap_or(i32::MAX);

        sqlx::query(
            r#"
            INSERT INTO quote_offers (
                id, quote_id, carrier_name, service, deadline_days, final_price
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(offer.id().as_uuid())
        .bind(offer.quote_id().as_uuid())
        .bind(offer.carrier_name())
        .bind(offer.service())
        .bind(deadline_days)
        .bind(offer.final_price())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Offer", offer.id().to_string()))?;

        Ok(())
    }

    async fn get_metrics(
        &self,
        last_quotes: Option<NonZeroU64>,
    ) -> RepositoryResult<MetricsResponse> {
        let limit: Option<i64> =
            last_quotes.map(|n| i64::try_from(n.get()).unwrap_or(i64::MAX));

        let rows: Vec<CarrierRow> = sqlx::query_as(CARRIER_METRICS_SQL)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(format!("query by carrier: {e}")))?;

        let (cheapest, most_expensive): (f64, f64) = sqlx::query_as(PRICE_RANGE_SQL)
            .bind(limit)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(format!("query min/max: {e}")))?;

        Ok(MetricsResponse {
            by_carrier: rows.into_iter().map(CarrierMetrics::from).collect(),
            cheapest,
            most_expensive,
        })
    }
}

/// Row type for the per-carrier aggregate.
#[derive(Debug, sqlx::FromRow)]
struct CarrierRow {
    carrier_name: String,
    total_quotes: i64,
    total_freight: f64,
    average_freight: f64,
}

impl From<CarrierRow> for CarrierMetrics {
    fn from(row: CarrierRow) -> Self {
        Self {
            carrier_name: row.carrier_name,
            total_quotes: u64::try_from(row.total_quotes).unwrap_or(0),
            total_freight: row.total_freight,
            average_freight: row.average_freight,
        }
    }
}

/// Classifies a sqlx error for a write on `entity_type`.
fn map_sqlx_error(error: sqlx::Error, entity_type: &'static str, id: String) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::duplicate(entity_type, id)
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepositoryError::not_found("Quote", db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::connection(error.to_string())
        }
        _ => RepositoryError::query(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_row_converts() {
        let metrics = CarrierMetrics::from(CarrierRow {
            carrier_name: "Correios".to_string(),
            total_quotes: 2,
            total_freight: 41.98,
            average_freight: 20.99,
        });
        assert_eq!(metrics.carrier_name, "Correios");
        assert_eq!(metrics.total_quotes, 2);
        assert_eq!(metrics.average_freight, 20.99);
    }

    #[test]
    fn pool_errors_are_connection_errors() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut, "Quote", "q".to_string());
        assert!(matches!(err, RepositoryError::Connection(_)));
    }

    #[test]
    fn other_errors_are_query_errors() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound, "Offer", "o".to_string());
        assert!(matches!(err, RepositoryError::Query(_)));
    }

    #[test]
    fn metrics_queries_share_selection() {
        for sql in [CARRIER_METRICS_SQL, PRICE_RANGE_SQL] {
            assert!(sql.contains("ORDER BY created_at DESC, seq DESC LIMIT $1"));
            assert!(sql.contains("COALESCE"));
        }
    }
}
