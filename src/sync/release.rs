use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::store::{Store, load_sha};
use crate::types::{ReleaseCheckResult, ReleaseInfo};

/// HTTP access to the release feed and its assets.
#[derive(Clone)]
pub struct ReleaseFeed {
    client: Client,
    feed_url: String,
}

impl ReleaseFeed {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.http_timeout())
            .build()?;
        Ok(Self {
            client,
            feed_url: config.release_feed_url.clone(),
        })
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn latest_release(&self) -> Result<ReleaseInfo> {
        debug!("Requesting release metadata from {}", self.feed_url);
        let release = self
            .client
            .get(&self.feed_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<ReleaseInfo>()
            .await?;
        Ok(release)
    }
}

struct CachedCheck {
    checked_at: Instant,
    result: ReleaseCheckResult,
}

/// Compares the latest published version against the stored one, hitting
/// the network at most once per cool-down window.
pub struct ReleaseChecker {
    feed: ReleaseFeed,
    store: Arc<dyn Store>,
    cooldown: Duration,
    cache: Mutex<Option<CachedCheck>>,
}

impl ReleaseChecker {
    pub fn new(feed: ReleaseFeed, store: Arc<dyn Store>, cooldown: Duration) -> Self {
        Self {
            feed,
            store,
            cooldown,
            cache: Mutex::new(None),
        }
    }

    fn cached(&self) -> Option<ReleaseCheckResult> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache
            .as_ref()
            .filter(|c| c.checked_at.elapsed() < self.cooldown)
            .map(|c| c.result.clone())
    }

    pub async fn check_for_update(&self) -> Result<ReleaseCheckResult> {
        // The stored version is always re-read; only the remote half is cached.
        let old = load_sha(self.store.as_ref())?;

        if let Some(mut result) = self.cached() {
            debug!("Reusing cached release check");
            result.old = old;
            return Ok(result);
        }

        let release = self.feed.latest_release().await?;
        let new = release
            .target_commitish
            .filter(|v| !v.is_empty())
            .ok_or(Error::NoVersionInfo)?;

        let result = ReleaseCheckResult {
            old,
            new,
            new_link: release.html_url.unwrap_or_default(),
        };

        info!(
            old = result.old.as_deref().unwrap_or("none"),
            new = %result.new,
            "Checked latest release"
        );

        *self.cache.lock().unwrap_or_else(|e| e.into_inner()) = Some(CachedCheck {
            checked_at: Instant::now(),
            result: result.clone(),
        });

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SqliteStore, keys};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn setup(server: &MockServer, temp: &TempDir, cooldown: Duration) -> (ReleaseChecker, Arc<dyn Store>) {
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        let store: Arc<dyn Store> = Arc::new(store);

        let config = SyncConfig {
            release_feed_url: format!("{}/releases/latest", server.uri()),
            ..Default::default()
        };
        let feed = ReleaseFeed::new(&config).unwrap();
        (ReleaseChecker::new(feed, store.clone(), cooldown), store)
    }

    #[tokio::test]
    async fn test_check_returns_versions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "target_commitish": "new-sha",
                "html_url": "https://example.invalid/release/1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let (checker, store) = setup(&server, &temp, Duration::from_secs(60));
        store.put_all(&[(keys::SHA, "\"old-sha\"".to_string())]).unwrap();

        let result = checker.check_for_update().await.unwrap();
        assert_eq!(result.old.as_deref(), Some("old-sha"));
        assert_eq!(result.new, "new-sha");
        assert_eq!(result.new_link, "https://example.invalid/release/1");
        assert!(result.has_update());
    }

    #[tokio::test]
    async fn test_checks_within_cooldown_hit_network_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "target_commitish": "new-sha",
                "html_url": "https://example.invalid/release/1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let (checker, store) = setup(&server, &temp, Duration::from_secs(60));

        let first = checker.check_for_update().await.unwrap();
        assert_eq!(first.old, None);

        store.put_all(&[(keys::SHA, "\"new-sha\"".to_string())]).unwrap();

        let second = checker.check_for_update().await.unwrap();
        assert_eq!(second.new, "new-sha");
        assert_eq!(second.old.as_deref(), Some("new-sha"));
        assert!(!second.has_update());
    }

    #[tokio::test]
    async fn test_expired_cooldown_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "target_commitish": "new-sha",
                "html_url": "https://example.invalid/release/1"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let (checker, _store) = setup(&server, &temp, Duration::ZERO);

        checker.check_for_update().await.unwrap();
        checker.check_for_update().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_version_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let (checker, _store) = setup(&server, &temp, Duration::from_secs(60));

        let result = checker.check_for_update().await;
        assert!(matches!(result, Err(Error::NoVersionInfo)));
    }

    #[tokio::test]
    async fn test_http_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let (checker, _store) = setup(&server, &temp, Duration::from_secs(60));

        let result = checker.check_for_update().await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
