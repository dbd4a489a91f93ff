use serde::{Deserialize, Serialize};

use crate::types::DownloadStatus;

pub const DEFAULT_SUGGEST_LIMIT: usize = 5;
pub const MAX_SUGGEST_LIMIT: usize = 100;

/// Control messages sent by other surfaces.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundMessage {
    GetTagData,
    CheckVersion,
}

#[derive(Debug, Serialize)]
pub struct UpdateAccepted {
    /// False when an update was already running and this request was dropped.
    pub started: bool,
    pub status: DownloadStatus,
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

impl SuggestParams {
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_SUGGEST_LIMIT)
            .min(MAX_SUGGEST_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub tag: String,
    pub name: String,
}
