use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use crate::db::sql::{BuiltQuery, SqlParam};
use crate::models::Job;

/// Runs built SQL against the store.
///
/// Store errors are returned untouched; callers decide what they mean.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Rows shaped as [`Job`].
    async fn fetch_jobs(&self, query: &BuiltQuery) -> Result<Vec<Job>, sqlx::Error>;

    /// Single `id` column rows, e.g. from `DELETE ... RETURNING id`.
    async fn fetch_ids(&self, query: &BuiltQuery) -> Result<Vec<i32>, sqlx::Error>;
}

fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [SqlParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            SqlParam::Text(text) => query.bind(text.as_str()),
            SqlParam::Int(int) => query.bind(*int),
            SqlParam::Decimal(decimal) => query.bind(decimal.clone()),
        };
    }
    query
}

#[async_trait]
impl QueryExecutor for PgPool {
    async fn fetch_jobs(&self, query: &BuiltQuery) -> Result<Vec<Job>, sqlx::Error> {
        debug!(sql = %query.sql, params = query.values.len(), "fetch_jobs");
        bind_values(sqlx::query_as::<_, Job>(&query.sql), &query.values)
            .fetch_all(self)
            .await
    }

    async fn fetch_ids(&self, query: &BuiltQuery) -> Result<Vec<i32>, sqlx::Error> {
        debug!(sql = %query.sql, params = query.values.len(), "fetch_ids");
        let rows = bind_values(sqlx::query_as::<_, (i32,)>(&query.sql), &query.values)
            .fetch_all(self)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
