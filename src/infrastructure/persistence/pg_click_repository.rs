//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    device_type: Option<String>,
    browser_name: Option<String>,
    os_name: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_id: r.link_id,
            clicked_at: r.clicked_at,
            ip_address: r.ip_address,
            user_agent: r.user_agent,
            device_type: r.device_type,
            browser_name: r.browser_name,
            os_name: r.os_name,
        }
    }
}

/// PostgreSQL repository for the click event log.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row: ClickRow = sqlx::query_as(
            r#"
            INSERT INTO link_clicks (link_id, ip_address, user_agent, device_type, browser_name, os_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, link_id, clicked_at, ip_address, user_agent, device_type, browser_name, os_name
            "#,
        )
        .bind(new_click.link_id)
        .bind(&new_click.ip_address)
        .bind(&new_click.user_agent)
        .bind(&new_click.device_type)
        .bind(&new_click.browser_name)
        .bind(&new_click.os_name)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let rows: Vec<ClickRow> = sqlx::query_as(
            r#"
            SELECT id, link_id, clicked_at, ip_address, user_agent, device_type, browser_name, os_name
            FROM link_clicks
            WHERE link_id = $1
            ORDER BY clicked_at ASC, id ASC
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
