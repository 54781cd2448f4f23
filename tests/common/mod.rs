#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;
use tokio::task::JoinHandle;
use tower::Layer;

use clicktrail::application::services::{AnalyticsService, AuthService, LinkService, hash_token};
use clicktrail::domain::click_recorder::ClickRecorder;
use clicktrail::domain::click_worker::run_click_worker;
use clicktrail::domain::entities::{Click, Link, NewClick, NewLink};
use clicktrail::domain::repositories::{
    ApiToken, ClickRepository, LinkRepository, TokenRepository,
};
use clicktrail::error::AppError;
use clicktrail::routes::router;
use clicktrail::state::AppState;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://localhost:3000";
pub const OWNER_ID: i64 = 1;
pub const OWNER_TOKEN: &str = "owner-token";
pub const OTHER_OWNER_ID: i64 = 2;
pub const OTHER_TOKEN: &str = "other-token";

// ---------------------------------------------------------------------------
// In-memory repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
}

impl InMemoryLinkRepository {
    /// Inserts a fully specified link, bypassing the service.
    pub fn insert(
        &self,
        short_code: &str,
        alias: Option<&str>,
        destination_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Link {
        let mut links = self.links.lock().unwrap();
        let now = Utc::now();
        let link = Link {
            id: links.len() as i64 + 1,
            owner_id: OWNER_ID,
            destination_url: destination_url.to_string(),
            short_code: short_code.to_string(),
            custom_alias: alias.map(str::to_string),
            click_count: 0,
            expires_at,
            active: true,
            created_at: now,
            updated_at: now,
        };
        links.push(link.clone());
        link
    }

    pub fn click_count(&self, id: i64) -> i64 {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.click_count)
            .unwrap_or_default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();

        let taken = |code: &str| links.iter().any(|l| l.matches_code(code));
        if taken(new_link.short_code.as_str())
            || new_link.custom_alias.as_deref().is_some_and(taken)
        {
            return Err(AppError::conflict("Unique constraint violation", json!({})));
        }

        let now = Utc::now();
        let link = Link {
            id: links.len() as i64 + 1,
            owner_id: new_link.owner_id,
            destination_url: new_link.destination_url,
            short_code: new_link.short_code,
            custom_alias: new_link.custom_alias,
            click_count: 0,
            expires_at: new_link.expires_at,
            active: true,
            created_at: now,
            updated_at: now,
        };
        links.push(link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let links = self.links.lock().unwrap();
        Ok(links.iter().find(|l| l.matches_code(code)).cloned())
    }

    async fn find_owned_by_code(
        &self,
        code: &str,
        owner_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let links = self.links.lock().unwrap();
        Ok(links
            .iter()
            .find(|l| l.owner_id == owner_id && l.matches_code(code))
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let links = self.links.lock().unwrap();
        let mut owned: Vec<Link> = links
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn increment_click_count(&self, link_id: i64) -> Result<Option<i64>, AppError> {
        let mut links = self.links.lock().unwrap();
        Ok(links.iter_mut().find(|l| l.id == link_id).map(|l| {
            l.click_count += 1;
            l.updated_at = Utc::now();
            l.click_count
        }))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryClickRepository {
    clicks: Mutex<Vec<Click>>,
}

impl InMemoryClickRepository {
    /// Seeds a click at an explicit time, e.g. days in the past.
    pub fn seed(&self, link_id: i64, clicked_at: DateTime<Utc>, device: &str, browser: &str) {
        let mut clicks = self.clicks.lock().unwrap();
        let id = clicks.len() as i64 + 1;
        clicks.push(Click {
            id,
            link_id,
            clicked_at,
            ip_address: None,
            user_agent: None,
            device_type: Some(device.to_string()),
            browser_name: Some(browser.to_string()),
            os_name: None,
        });
    }

    pub fn for_link(&self, link_id: i64) -> Vec<Click> {
        self.clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut clicks = self.clicks.lock().unwrap();
        let click = new_click.into_click(clicks.len() as i64 + 1, Utc::now());
        clicks.push(click.clone());
        Ok(click)
    }

    async fn list_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        Ok(self.for_link(link_id))
    }
}

/// Click store whose writes always fail.
pub struct FailingClickRepository;

#[async_trait]
impl ClickRepository for FailingClickRepository {
    async fn record_click(&self, _new_click: NewClick) -> Result<Click, AppError> {
        Err(AppError::internal("Database error", json!({})))
    }

    async fn list_for_link(&self, _link_id: i64) -> Result<Vec<Click>, AppError> {
        Ok(Vec::new())
    }
}

/// Token store keyed by HMAC digest.
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    /// Store holding one active token per test owner.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let token = |id: i64, user_id: i64, raw: &str| ApiToken {
            id,
            user_id,
            name: format!("token-{id}"),
            token_hash: hash_token(SIGNING_SECRET, raw),
            created_at: now,
            last_used_at: None,
            revoked_at: None,
        };

        Self {
            tokens: Mutex::new(vec![
                token(1, OWNER_ID, OWNER_TOKEN),
                token(2, OTHER_OWNER_ID, OTHER_TOKEN),
            ]),
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_active_owner(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .map(|t| t.user_id))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(t) = tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            t.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.revoked_at.get_or_insert_with(Utc::now);
                Ok(())
            }
            None => Err(AppError::not_found("Token not found", json!({ "id": id }))),
        }
    }
}

// ---------------------------------------------------------------------------
// Application wiring
// ---------------------------------------------------------------------------

pub const PEER_ADDR: &str = "127.0.0.1:12345";

/// Inserts `ConnectInfo<SocketAddr>` into request extensions, where both the
/// `ConnectInfo` extractor and the rate limiter's key extractor read it.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// A running application over in-memory stores.
pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<InMemoryLinkRepository>,
    pub clicks: Arc<InMemoryClickRepository>,
    pub worker: JoinHandle<()>,
}

impl TestApp {
    pub fn new() -> Self {
        let clicks = Arc::new(InMemoryClickRepository::default());
        Self::build(clicks.clone(), clicks)
    }

    /// Application whose click writes always fail.
    pub fn with_failing_clicks() -> Self {
        Self::build(
            Arc::new(FailingClickRepository),
            Arc::new(InMemoryClickRepository::default()),
        )
    }

    fn build(
        click_store: Arc<dyn ClickRepository>,
        clicks: Arc<InMemoryClickRepository>,
    ) -> Self {
        let links = Arc::new(InMemoryLinkRepository::default());
        let tokens: Arc<dyn TokenRepository> = Arc::new(InMemoryTokenRepository::seeded());

        let (click_recorder, rx) = ClickRecorder::channel(100);
        let worker = tokio::spawn(run_click_worker(rx, click_store.clone(), 4));

        let link_service = Arc::new(LinkService::new(
            links.clone(),
            click_recorder.clone(),
            BASE_URL,
        ));
        let analytics_service = Arc::new(AnalyticsService::new(links.clone(), click_store));
        let auth_service = Arc::new(AuthService::new(tokens, SIGNING_SECRET.to_string()));

        let state = AppState {
            link_service,
            analytics_service,
            auth_service,
            click_recorder,
            behind_proxy: false,
        };

        let app = router(state).layer(MockConnectInfoLayer);
        let server = TestServer::new(app).unwrap();

        Self {
            server,
            links,
            clicks,
            worker,
        }
    }

    /// Waits until the click worker has written `expected` events for a link.
    pub async fn wait_for_clicks(&self, link_id: i64, expected: usize) -> Vec<Click> {
        for _ in 0..100 {
            let clicks = self.clicks.for_link(link_id);
            if clicks.len() >= expected {
                return clicks;
            }
            tokio::time::sleep(StdDuration::from_millis(20)).await;
        }
        self.clicks.for_link(link_id)
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

// ---------------------------------------------------------------------------
// PostgreSQL fixtures
// ---------------------------------------------------------------------------

pub async fn create_test_user(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_link(
    pool: &PgPool,
    owner_id: i64,
    short_code: &str,
    alias: Option<&str>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO links (owner_id, destination_url, short_code, custom_alias) \
         VALUES ($1, 'https://example.com', $2, $3) RETURNING id",
    )
    .bind(owner_id)
    .bind(short_code)
    .bind(alias)
    .fetch_one(pool)
    .await
    .unwrap()
}
