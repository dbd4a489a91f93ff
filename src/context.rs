//! The process-wide sync context: built once at startup and shared with every
//! handler behind an `Arc`.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::cache::TagCache;
use crate::config::{FALLBACK_RELEASE_LINK, SCHEMA_VERSION, SyncConfig};
use crate::error::Result;
use crate::status::StatusChannel;
use crate::store::{PersistedSnapshot, SnapshotMeta, Store, load_lookup, load_meta, load_tag_list};
use crate::sync::{
    FetchRun, Fetcher, ReleaseChecker, ReleaseFeed, TransformedDatabase, fallback_database,
    sort_groups, transform,
};
use crate::types::{
    DownloadStatus, NameLookupTable, ReleaseCheckResult, StatusPatch, TagDatabase, TagListEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapSource {
    /// Cache filled from previously persisted data.
    Persisted,
    /// Bundled snapshot applied because nothing usable was stored.
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    #[serde(flatten)]
    pub meta: SnapshotMeta,
    pub tag_count: usize,
    pub lookup_count: usize,
    pub status: DownloadStatus,
    /// Short indicator derived from `status`, e.g. `42%` or `ERR`.
    pub badge: String,
}

pub struct SyncContext {
    config: SyncConfig,
    store: Arc<dyn Store>,
    status: Arc<StatusChannel>,
    checker: ReleaseChecker,
    fetcher: Fetcher,
    cache: RwLock<Arc<TagCache>>,
}

impl SyncContext {
    pub fn new(config: SyncConfig, store: Arc<dyn Store>) -> Result<Self> {
        let status = Arc::new(StatusChannel::default());
        let feed = ReleaseFeed::new(&config)?;
        let checker = ReleaseChecker::new(feed.clone(), store.clone(), config.check_cooldown());
        let fetcher = Fetcher::new(feed, status.clone());

        Ok(Self {
            config,
            store,
            status,
            checker,
            fetcher,
            cache: RwLock::new(Arc::new(TagCache::default())),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> &StatusChannel {
        &self.status
    }

    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Latest cache; stays valid even if an update swaps it out.
    #[must_use]
    pub fn cache(&self) -> Arc<TagCache> {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn replace_cache(&self, tag_list: Vec<TagListEntry>, lookup: NameLookupTable) {
        let cache = Arc::new(TagCache::new(tag_list, lookup));
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = cache;
    }

    #[must_use]
    pub fn tag_list(&self) -> Vec<TagListEntry> {
        self.cache().tag_list.clone()
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.cache().lookup(name).map(str::to_string)
    }

    #[must_use]
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<TagListEntry> {
        self.cache().suggest(query, limit)
    }

    /// Fills the cache from storage, or applies the bundled snapshot when
    /// nothing usable is stored or it was written by another schema version.
    pub async fn bootstrap(&self) -> Result<BootstrapSource> {
        match self.load_persisted() {
            Ok(Some((tag_list, lookup))) => {
                info!(tags = tag_list.len(), "Loaded persisted tag data");
                self.replace_cache(tag_list, lookup);
                return Ok(BootstrapSource::Persisted);
            }
            Ok(None) => info!("No current tag data stored, loading bundled snapshot"),
            Err(e) => warn!("Stored tag data is unreadable ({e}), loading bundled snapshot"),
        }

        let database = fallback_database()
            .inspect_err(|e| {
                self.status.update(StatusPatch::failed(e.status_text()));
            })?;
        self.apply_database(database, FALLBACK_RELEASE_LINK).await?;
        Ok(BootstrapSource::Fallback)
    }

    fn load_persisted(&self) -> Result<Option<(Vec<TagListEntry>, NameLookupTable)>> {
        let store = self.store.as_ref();
        let meta = load_meta(store)?;
        if meta.data_structure_version != Some(SCHEMA_VERSION) {
            if let Some(version) = meta.data_structure_version {
                info!(
                    stored = version,
                    current = SCHEMA_VERSION,
                    "Stored tag data uses another schema version"
                );
            }
            return Ok(None);
        }

        match (load_tag_list(store)?, load_lookup(store)?) {
            (Some(tag_list), Some(lookup)) => Ok(Some((tag_list, lookup))),
            _ => Ok(None),
        }
    }

    /// Sorts, flattens and persists `database`, then swaps the cache. If the
    /// write fails the cache is left untouched and the failure is published
    /// on the status channel.
    pub async fn apply_database(&self, mut database: TagDatabase, release_link: &str) -> Result<()> {
        sort_groups(&mut database);
        let TransformedDatabase { tag_list, lookup } = transform(&database);

        let saved = PersistedSnapshot {
            database: &database,
            tag_list: &tag_list,
            lookup: &lookup,
            update_time: Utc::now(),
            release_link,
            sha: &database.head.sha,
            schema_version: SCHEMA_VERSION,
        }
        .save(self.store.as_ref());

        if let Err(e) = saved {
            error!("Failed to save tag database: {e}");
            self.status.update(StatusPatch::failed(e.status_text()));
            return Err(e);
        }

        info!(
            sha = %database.head.sha,
            tags = tag_list.len(),
            lookups = lookup.len(),
            "Tag database saved"
        );

        self.replace_cache(tag_list, lookup);
        self.status.update(StatusPatch::completed("Tag database updated"));
        self.schedule_idle_reset();
        Ok(())
    }

    fn schedule_idle_reset(&self) {
        let status = self.status.clone();
        let delay = self.config.complete_reset_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            status.reset_if_complete();
        });
    }

    /// Runs one full update attempt. Returns `Ok(false)` without doing
    /// anything when another attempt is already in flight.
    ///
    /// Failures are logged and published on the status channel before being
    /// returned, so callers that only fire the update may ignore the result.
    pub async fn update_database(&self) -> Result<bool> {
        match self.begin_update() {
            Some(run) => self.run_update(run).await.map(|()| true),
            None => Ok(false),
        }
    }

    /// Claims the single-flight slot for an update, resetting the status.
    /// `None` when another attempt holds it.
    #[must_use]
    pub fn begin_update(&self) -> Option<FetchRun> {
        self.fetcher.try_begin()
    }

    /// Fetches and applies the latest database under a slot claimed with
    /// [`Self::begin_update`]. The slot is released when this returns.
    pub async fn run_update(&self, run: FetchRun) -> Result<()> {
        let fetched = match run.fetch().await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!("Tag database download failed: {e}");
                return Err(e);
            }
        };

        let release_link = fetched
            .release
            .html_url
            .clone()
            .unwrap_or_else(|| FALLBACK_RELEASE_LINK.to_string());

        self.apply_database(fetched.database, &release_link).await?;

        drop(run);
        Ok(())
    }

    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.fetcher.is_running()
    }

    pub async fn check_version(&self) -> Result<ReleaseCheckResult> {
        self.checker.check_for_update().await
    }

    pub fn snapshot_info(&self) -> Result<SnapshotInfo> {
        let cache = self.cache();
        let status = self.status.current();
        Ok(SnapshotInfo {
            meta: load_meta(self.store.as_ref())?,
            tag_count: cache.tag_list.len(),
            lookup_count: cache.lookup.len(),
            badge: status.badge_text(),
            status,
        })
    }
}
