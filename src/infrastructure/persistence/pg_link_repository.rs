//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, owner_id, destination_url, short_code, custom_alias, \
     click_count, expires_at, active, created_at, updated_at";

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    owner_id: i64,
    destination_url: String,
    short_code: String,
    custom_alias: Option<String>,
    click_count: i64,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            owner_id: r.owner_id,
            destination_url: r.destination_url,
            short_code: r.short_code,
            custom_alias: r.custom_alias,
            click_count: r.click_count,
            expires_at: r.expires_at,
            active: r.active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uniqueness of codes across `short_code` and `custom_alias` is enforced by
/// the `links_code_namespace` trigger; violations surface as conflicts.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            "INSERT INTO links (owner_id, destination_url, short_code, custom_alias, expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {LINK_COLUMNS}"
        );

        let row: LinkRow = sqlx::query_as(&sql)
            .bind(new_link.owner_id)
            .bind(&new_link.destination_url)
            .bind(&new_link.short_code)
            .bind(&new_link.custom_alias)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE short_code = $1 OR custom_alias = $1 \
             LIMIT 1"
        );

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_owned_by_code(
        &self,
        code: &str,
        owner_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE (short_code = $1 OR custom_alias = $1) AND owner_id = $2 \
             LIMIT 1"
        );

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(code)
            .bind(owner_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );

        let rows: Vec<LinkRow> = sqlx::query_as(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn increment_click_count(&self, link_id: i64) -> Result<Option<i64>, AppError> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE links
            SET click_count = click_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING click_count
            "#,
        )
        .bind(link_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
