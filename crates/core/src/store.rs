//! PostgreSQL persistence for dashboard documents.
//!
//! The whole document lives in a JSONB column; the few columns beside it exist
//! for filtering and ordering.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::document::DashboardDocument;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not encode dashboard: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("stored dashboard {id} is unreadable: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Row of the `dashboards` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DashboardRow {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub created_by: Option<String>,
    pub layout: String,
    pub config: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DashboardRow {
    pub fn into_document(self) -> Result<DashboardDocument, StoreError> {
        let Json(config) = self.config;
        serde_json::from_value(config).map_err(|source| StoreError::Corrupt {
            id: self.id,
            source,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, category, created_by, layout, config, created_at, updated_at FROM dashboards";

#[derive(Debug, Clone)]
pub struct DashboardStore {
    pool: PgPool,
}

impl DashboardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Number of dashboards, restricted to `owners` when given.
    pub async fn count(&self, owners: Option<&[String]>) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM dashboards WHERE ($1::text[] IS NULL OR created_by = ANY($1))",
        )
        .bind(owners.map(<[String]>::to_vec))
        .fetch_one(&self.pool)
        .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// One page of dashboards ordered by name.
    pub async fn list(
        &self,
        owners: Option<&[String]>,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<DashboardDocument>, StoreError> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE ($1::text[] IS NULL OR created_by = ANY($1)) \
             ORDER BY lower(name), id LIMIT $2 OFFSET $3"
        );
        let rows: Vec<DashboardRow> = sqlx::query_as(&sql)
            .bind(owners.map(<[String]>::to_vec))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(skip).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(DashboardRow::into_document).collect()
    }

    pub async fn find(&self, id: &str) -> Result<Option<DashboardDocument>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = $1");
        let row: Option<DashboardRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(DashboardRow::into_document).transpose()
    }

    pub async fn create(&self, document: &DashboardDocument) -> Result<(), StoreError> {
        let config = serde_json::to_value(document).map_err(StoreError::Encode)?;
        sqlx::query(
            "INSERT INTO dashboards (id, name, category, created_by, layout, config) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&document.id)
        .bind(&document.name)
        .bind(&document.category)
        .bind(&document.created_by)
        .bind(document.layout.as_str())
        .bind(Json(config))
        .execute(&self.pool)
        .await?;
        tracing::debug!(dashboard_id = %document.id, "dashboard row inserted");
        Ok(())
    }

    /// Replace a stored dashboard. Returns false when the id is unknown.
    pub async fn update(&self, document: &DashboardDocument) -> Result<bool, StoreError> {
        let config = serde_json::to_value(document).map_err(StoreError::Encode)?;
        let result = sqlx::query(
            "UPDATE dashboards SET name = $2, category = $3, created_by = $4, layout = $5, \
             config = $6, updated_at = now() WHERE id = $1",
        )
        .bind(&document.id)
        .bind(&document.name)
        .bind(&document.category)
        .bind(&document.created_by)
        .bind(document.layout.as_str())
        .bind(Json(config))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM dashboards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
