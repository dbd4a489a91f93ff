use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_RELEASE_FEED_URL: &str =
    "https://api.github.com/repos/EhTagTranslation/Database/releases/latest";

/// Release link recorded when data comes from the bundled snapshot.
pub const FALLBACK_RELEASE_LINK: &str = "https://github.com/EhTagTranslation/Database/releases";

/// Bump whenever the persisted list or lookup layout changes; a mismatch on
/// startup forces a reload from the bundled snapshot.
pub const SCHEMA_VERSION: i64 = 6;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Endpoint returning the latest release as JSON.
    pub release_feed_url: String,
    pub user_agent: String,
    pub check_cooldown_secs: u64,
    pub complete_reset_ms: u64,
    pub http_timeout_secs: u64,
}

impl SyncConfig {
    /// Loads a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("tagsync.db")
    }

    #[must_use]
    pub fn check_cooldown(&self) -> Duration {
        Duration::from_secs(self.check_cooldown_secs)
    }

    #[must_use]
    pub fn complete_reset_delay(&self) -> Duration {
        Duration::from_millis(self.complete_reset_ms)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            data_dir: PathBuf::from("./data"),
            release_feed_url: DEFAULT_RELEASE_FEED_URL.to_string(),
            user_agent: concat!("tagsync/", env!("CARGO_PKG_VERSION")).to_string(),
            check_cooldown_secs: 60,
            complete_reset_ms: 2500,
            http_timeout_secs: 60,
        }
    }
}
