use std::io::Read;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use flate2::read::GzDecoder;
use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use super::release::ReleaseFeed;
use crate::error::{Error, Result};
use crate::status::StatusChannel;
use crate::types::{FetchedDatabase, StatusPatch, TagDatabase};

/// Release asset holding the gzip-compressed database.
pub const DATABASE_ASSET_NAME: &str = "db.html.json.gz";

/// Upper bound on the buffer reserved from an advertised length.
const MAX_PREALLOC: usize = 32 * 1024 * 1024;

pub struct Fetcher {
    feed: ReleaseFeed,
    status: Arc<StatusChannel>,
    in_flight: Arc<Mutex<()>>,
}

/// An update attempt holding the single-flight slot. Dropping it frees the
/// slot. Owns everything it needs so it can be moved into a spawned task.
pub struct FetchRun {
    feed: ReleaseFeed,
    status: Arc<StatusChannel>,
    _slot: OwnedMutexGuard<()>,
}

impl Fetcher {
    pub fn new(feed: ReleaseFeed, status: Arc<StatusChannel>) -> Self {
        Self {
            feed,
            status,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Claims the single-flight slot, or returns `None` when another attempt
    /// already holds it. A successful claim resets the status.
    pub fn try_begin(&self) -> Option<FetchRun> {
        let Ok(slot) = self.in_flight.clone().try_lock_owned() else {
            debug!("Database update already in flight, ignoring request");
            return None;
        };

        self.status.reset();
        self.status.update(
            StatusPatch::progress(0)
                .with_run(true)
                .with_info("Fetching release info"),
        );

        Some(FetchRun {
            feed: self.feed.clone(),
            status: self.status.clone(),
            _slot: slot,
        })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Downloads and parses the latest database. `Ok(None)` means another
    /// fetch was already running and nothing was done.
    pub async fn fetch_latest_database(&self) -> Result<Option<FetchedDatabase>> {
        match self.try_begin() {
            Some(run) => run.fetch().await.map(Some),
            None => Ok(None),
        }
    }
}

impl FetchRun {
    pub async fn fetch(&self) -> Result<FetchedDatabase> {
        match self.fetch_inner().await {
            Ok(fetched) => Ok(fetched),
            Err(e) => {
                debug!("Database fetch failed: {e}");
                self.status.update(StatusPatch::failed(e.status_text()));
                Err(e)
            }
        }
    }

    async fn fetch_inner(&self) -> Result<FetchedDatabase> {
        let release = self.feed.latest_release().await?;
        if release.assets.is_none() {
            return Err(Error::NoVersionInfo);
        }

        let asset = release
            .asset(DATABASE_ASSET_NAME)
            .filter(|a| !a.browser_download_url.is_empty())
            .ok_or(Error::NoDownloadUrl)?;

        info!(
            version = release.target_commitish.as_deref().unwrap_or("unknown"),
            "Downloading {}",
            asset.browser_download_url
        );

        let payload = self.download(&asset.browser_download_url, asset.size).await?;
        if let Some(digest) = asset.digest.as_deref() {
            verify_digest(&payload, digest)?;
        }

        self.status.update(
            StatusPatch::progress(100).with_info("Download complete, processing"),
        );

        let database = decode_database(&payload)?;
        info!(
            sha = %database.head.sha,
            groups = database.data.len(),
            bytes = payload.len(),
            "Parsed tag database"
        );

        Ok(FetchedDatabase { release, database })
    }

    /// Streams the asset body. Progress uses the response length, falling
    /// back to the size listed in the release feed.
    async fn download(&self, url: &str, listed_size: Option<u64>) -> Result<Bytes> {
        let response = self
            .feed
            .client()
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let total = response
            .content_length()
            .or(listed_size)
            .filter(|len| *len > 0);
        let mut buffer = BytesMut::with_capacity(prealloc_len(total));
        let mut stream = response.bytes_stream();
        let mut last_percent = 0u8;

        self.status.update(StatusPatch::progress(0).with_info("Downloading"));

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.extend_from_slice(&chunk);

            if let Some(total) = total {
                let percent = progress_percent(buffer.len() as u64, total);
                if percent != last_percent {
                    last_percent = percent;
                    self.status.update(StatusPatch::progress(percent));
                }
            }
        }

        debug!("Downloaded {} bytes", buffer.len());
        Ok(buffer.freeze())
    }
}

fn prealloc_len(total: Option<u64>) -> usize {
    total.map_or(0, |t| usize::try_from(t).unwrap_or(usize::MAX).min(MAX_PREALLOC))
}

/// Whole percent of `loaded` over `total`, rounded down and capped at 100.
#[must_use]
pub fn progress_percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (loaded.saturating_mul(100) / total).min(100) as u8
}

/// Gunzips and parses a downloaded artifact.
pub fn decode_database(payload: &[u8]) -> Result<TagDatabase> {
    let mut text = String::new();
    GzDecoder::new(payload)
        .read_to_string(&mut text)
        .map_err(|e| Error::Parse(format!("decompression failed: {e}")))?;

    serde_json::from_str(&text).map_err(|e| Error::Parse(e.to_string()))
}

fn verify_digest(payload: &[u8], digest: &str) -> Result<()> {
    let Some(expected) = digest.strip_prefix("sha256:") else {
        debug!("Skipping unsupported digest {digest}");
        return Ok(());
    };

    let actual = hex::encode(Sha256::digest(payload));
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(Error::Parse(format!(
            "digest mismatch: expected {expected}, got {actual}"
        )));
    }
    Ok(())
}
