//! Link creation, listing and resolution service.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_recorder::ClickRecorder;
use crate::domain::entities::{Link, NewLink, Resolution, ResolvedLink, is_redirectable};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_alias};
use serde_json::json;

/// Attempts at finding a free generated code before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Input for [`LinkService::create_link`].
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub destination_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Service for creating, listing and resolving shortened links.
///
/// Resolution performs exactly one lookup and, for live links, one atomic
/// increment before handing the click to the [`ClickRecorder`].
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    click_recorder: ClickRecorder,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are built from.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        click_recorder: ClickRecorder,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            click_recorder,
            base_url: base_url.into(),
        }
    }

    /// Creates a short link owned by `owner_id`.
    ///
    /// The destination URL and alias are trimmed; an empty alias counts as
    /// absent. A generated short code is always assigned, even when an alias
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or the alias breaks
    /// the alias rules.
    /// Returns [`AppError::Conflict`] if the alias is already in use as a code
    /// or alias.
    /// Returns [`AppError::Internal`] if no free code is found or on database
    /// errors.
    pub async fn create_link(&self, owner_id: i64, input: CreateLink) -> Result<Link, AppError> {
        let destination_url = input.destination_url.trim().to_string();
        if destination_url.is_empty() {
            return Err(AppError::bad_request(
                "Destination URL is required",
                json!({ "field": "longUrl" }),
            ));
        }
        if !is_redirectable(&destination_url) {
            return Err(AppError::bad_request(
                "Destination URL must not contain control characters",
                json!({ "field": "longUrl" }),
            ));
        }

        let custom_alias = input
            .custom_alias
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        if let Some(alias) = &custom_alias {
            validate_custom_alias(alias)?;

            if self.link_repository.find_by_code(alias).await?.is_some() {
                return Err(AppError::conflict(
                    "Custom alias already in use",
                    json!({ "customAlias": alias }),
                ));
            }
        }

        let short_code = self.generate_unique_code().await?;

        let link = self
            .link_repository
            .create(NewLink {
                owner_id,
                destination_url,
                short_code,
                custom_alias,
                expires_at: input.expires_at,
            })
            .await?;

        debug!(link_id = link.id, owner_id, code = %link.public_code(), "link created");

        Ok(link)
    }

    /// Lists the owner's links, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_links(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_owner(owner_id).await
    }

    /// Resolves a short code and counts the click.
    ///
    /// The code is matched verbatim against short codes and aliases. Expired
    /// and unknown links are reported without touching any counter. For a
    /// live link the click count is incremented synchronously, then a click
    /// event is queued without waiting for it to be written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lookup or the increment fails, or
    /// if the stored destination cannot be redirected to (nothing is counted).
    /// Click event persistence never fails this call.
    pub async fn resolve(
        &self,
        code: &str,
        ip: Option<String>,
        user_agent: Option<&str>,
    ) -> Result<Resolution, AppError> {
        let Some(link) = self.link_repository.find_by_code(code).await? else {
            return Ok(Resolution::NotFound);
        };

        if link.is_expired() {
            debug!(link_id = link.id, code, "link expired");
            return Ok(Resolution::Expired);
        }

        // Checked before counting so a broken row never accumulates clicks.
        if !link.has_redirectable_destination() {
            warn!(link_id = link.id, code, "stored destination is not redirectable");
            return Err(AppError::internal(
                "Destination URL is not a valid redirect target",
                json!({ "link_id": link.id }),
            ));
        }

        // Row removed between lookup and increment.
        let Some(click_count) = self
            .link_repository
            .increment_click_count(link.id)
            .await?
        else {
            return Ok(Resolution::NotFound);
        };

        self.click_recorder.record(ClickEvent::new(link.id, ip, user_agent));

        Ok(Resolution::Resolved(ResolvedLink {
            link_id: link.id,
            destination_url: link.destination_url,
            click_count,
        }))
    }

    /// Builds the public short URL of a link from the configured base URL.
    pub fn short_url(&self, link: &Link) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            link.public_code()
        )
    }

    /// Verifies that the link store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.link_repository.health_check().await
    }

    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code()?;

            if self.link_repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::sample_link;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;
    use mockall::predicate::eq;

    fn service(repo: MockLinkRepository) -> (LinkService, tokio::sync::mpsc::Receiver<ClickEvent>) {
        let (recorder, rx) = ClickRecorder::channel(16);
        let svc = LinkService::new(Arc::new(repo), recorder, "https://sho.rt/");
        (svc, rx)
    }

    fn created(new_link: NewLink) -> Link {
        let mut link = sample_link(10, &new_link.short_code, new_link.custom_alias.as_deref());
        link.owner_id = new_link.owner_id;
        link.destination_url = new_link.destination_url;
        link.expires_at = new_link.expires_at;
        link
    }

    #[tokio::test]
    async fn test_create_link_with_generated_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_create()
            .withf(|n: &NewLink| {
                n.owner_id == 7
                    && n.destination_url == "https://example.com/page"
                    && n.short_code.len() == 8
                    && n.custom_alias.is_none()
            })
            .times(1)
            .returning(|n| Ok(created(n)));

        let (svc, _rx) = service(repo);
        let link = svc
            .create_link(
                7,
                CreateLink {
                    destination_url: "  https://example.com/page ".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(link.owner_id, 7);
        assert_eq!(link.short_code.len(), 8);
    }

    #[tokio::test]
    async fn test_create_link_with_alias() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_code()
            .withf(|code| code != "promo")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|n: &NewLink| n.custom_alias.as_deref() == Some("promo"))
            .times(1)
            .returning(|n| Ok(created(n)));

        let (svc, _rx) = service(repo);
        let link = svc
            .create_link(
                1,
                CreateLink {
                    destination_url: "https://example.com".to_string(),
                    custom_alias: Some(" promo ".to_string()),
                    expires_at: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(link.public_code(), "promo");
        assert_eq!(svc.short_url(&link), "https://sho.rt/promo");
    }

    #[tokio::test]
    async fn test_create_link_empty_alias_is_absent() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_create()
            .withf(|n: &NewLink| n.custom_alias.is_none())
            .times(1)
            .returning(|n| Ok(created(n)));

        let (svc, _rx) = service(repo);
        let result = svc
            .create_link(
                1,
                CreateLink {
                    destination_url: "https://example.com".to_string(),
                    custom_alias: Some("   ".to_string()),
                    expires_at: None,
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_link_alias_conflict() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| Ok(Some(sample_link(1, "abcdefgh", Some("promo")))));
        repo.expect_create().times(0);

        let (svc, _rx) = service(repo);
        let err = svc
            .create_link(
                2,
                CreateLink {
                    destination_url: "https://other.example".to_string(),
                    custom_alias: Some("promo".to_string()),
                    expires_at: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_link_invalid_alias() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);
        repo.expect_create().times(0);

        let (svc, _rx) = service(repo);
        let err = svc
            .create_link(
                1,
                CreateLink {
                    destination_url: "https://example.com".to_string(),
                    custom_alias: Some("health".to_string()),
                    expires_at: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_link_gives_up_after_collisions() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|code| Ok(Some(sample_link(1, code, None))));
        repo.expect_create().times(0);

        let (svc, _rx) = service(repo);
        let err = svc
            .create_link(
                1,
                CreateLink {
                    destination_url: "https://example.com".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_resolve_counts_and_queues_click() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| Ok(Some(sample_link(3, "abcdefgh", Some("promo")))));
        repo.expect_increment_click_count()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(Some(1)));

        let (svc, mut rx) = service(repo);
        let resolution = svc
            .resolve("promo", Some("203.0.113.7".to_string()), Some("curl/8.0"))
            .await
            .unwrap();

        assert_eq!(
            resolution,
            Resolution::Resolved(ResolvedLink {
                link_id: 3,
                destination_url: "https://example.com".to_string(),
                click_count: 1,
            })
        );

        let event = rx.try_recv().unwrap();
        assert_eq!(event.link_id, 3);
        assert_eq!(event.ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(event.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[tokio::test]
    async fn test_resolve_not_found_touches_nothing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_increment_click_count().times(0);

        let (svc, mut rx) = service(repo);
        let resolution = svc.resolve("missing", None, None).await.unwrap();

        assert_eq!(resolution, Resolution::NotFound);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_expired_touches_nothing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| {
            let mut link = sample_link(4, "oldlink1", None);
            link.expires_at = Some(Utc::now() - Duration::hours(1));
            Ok(Some(link))
        });
        repo.expect_increment_click_count().times(0);

        let (svc, mut rx) = service(repo);
        let resolution = svc.resolve("oldlink1", None, None).await.unwrap();

        assert_eq!(resolution, Resolution::Expired);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_future_expiry_is_live() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| {
            let mut link = sample_link(5, "soonlink", None);
            link.expires_at = Some(Utc::now() + Duration::hours(1));
            Ok(Some(link))
        });
        repo.expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(Some(8)));

        let (svc, _rx) = service(repo);
        let resolution = svc.resolve("soonlink", None, None).await.unwrap();

        assert!(matches!(resolution, Resolution::Resolved(r) if r.click_count == 8));
    }

    #[tokio::test]
    async fn test_resolve_increment_failure_propagates_without_event() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(sample_link(6, "abcdefgh", None))));
        repo.expect_increment_click_count()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let (svc, mut rx) = service(repo);
        let err = svc.resolve("abcdefgh", None, None).await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_succeeds_when_queue_closed() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(sample_link(7, "abcdefgh", None))));
        repo.expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(Some(1)));

        let (svc, rx) = service(repo);
        drop(rx);

        let resolution = svc.resolve("abcdefgh", None, None).await.unwrap();

        assert!(matches!(resolution, Resolution::Resolved(_)));
    }

    #[tokio::test]
    async fn test_create_link_rejects_control_characters() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);
        repo.expect_create().times(0);

        let (svc, _rx) = service(repo);
        let err = svc
            .create_link(
                1,
                CreateLink {
                    destination_url: "https://example.com/a\nb".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_resolve_unredirectable_destination_is_not_counted() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| {
            let mut link = sample_link(8, "nl123456", None);
            link.destination_url = "https://example.com/a\nb".to_string();
            Ok(Some(link))
        });
        repo.expect_increment_click_count().times(0);

        let (svc, mut rx) = service(repo);
        let err = svc.resolve("nl123456", None, None).await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
        assert!(rx.try_recv().is_err());
    }
}
