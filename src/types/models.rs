use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One translation entry as published in the database artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    /// Auxiliary fields such as `intro` and `links`, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagGroup {
    pub namespace: String,
    #[serde(default)]
    pub data: IndexMap<String, TagRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseHead {
    pub sha: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The decompressed `db.html.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDatabase {
    pub head: DatabaseHead,
    pub data: Vec<TagGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagListEntry {
    pub key: String,
    pub namespace: String,
    pub name: String,
    pub search: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Maps `namespace:key` to a display name. `misc` entries are also reachable
/// by their bare key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameLookupTable(IndexMap<String, String>);

impl NameLookupTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, display: impl Into<String>) {
        self.0.insert(name.into(), display.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadStatus {
    pub run: bool,
    pub progress: u8,
    pub info: String,
    pub complete: bool,
    pub error: bool,
}

impl DownloadStatus {
    /// Text a toolbar badge would show for this status.
    #[must_use]
    pub fn badge_text(&self) -> String {
        if self.error {
            "ERR".to_string()
        } else if self.complete {
            "OK".to_string()
        } else if self.run {
            format!("{}%", self.progress)
        } else {
            String::new()
        }
    }
}

/// Partial update merged into the current [`DownloadStatus`].
#[derive(Debug, Clone, Default)]
pub struct StatusPatch {
    pub run: Option<bool>,
    pub progress: Option<u8>,
    pub info: Option<String>,
    pub complete: Option<bool>,
    pub error: Option<bool>,
}

impl StatusPatch {
    #[must_use]
    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress.min(100)),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    #[must_use]
    pub fn with_run(mut self, run: bool) -> Self {
        self.run = Some(run);
        self
    }

    #[must_use]
    pub fn failed(info: impl Into<String>) -> Self {
        Self {
            run: Some(false),
            error: Some(true),
            info: Some(info.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn completed(info: impl Into<String>) -> Self {
        Self {
            run: Some(false),
            progress: Some(100),
            complete: Some(true),
            info: Some(info.into()),
            ..Default::default()
        }
    }

    pub fn apply_to(self, status: &mut DownloadStatus) {
        if let Some(run) = self.run {
            status.run = run;
        }
        if let Some(progress) = self.progress {
            status.progress = progress;
        }
        if let Some(info) = self.info {
            status.info = info;
        }
        if let Some(complete) = self.complete {
            status.complete = complete;
        }
        if let Some(error) = self.error {
            status.error = error;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(default)]
    pub browser_download_url: String,
    #[serde(default)]
    pub size: Option<u64>,
    /// `sha256:<hex>` when the feed publishes one.
    #[serde(default)]
    pub digest: Option<String>,
}

/// Subset of the release feed response that the pipeline reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub target_commitish: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub assets: Option<Vec<ReleaseAsset>>,
}

impl ReleaseInfo {
    #[must_use]
    pub fn asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.as_ref()?.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseCheckResult {
    pub old: Option<String>,
    pub new: String,
    pub new_link: String,
}

impl ReleaseCheckResult {
    #[must_use]
    pub fn has_update(&self) -> bool {
        self.old.as_deref() != Some(self.new.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FetchedDatabase {
    pub release: ReleaseInfo,
    pub database: TagDatabase,
}
