use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot retrieve version info")]
    NoVersionInfo,

    #[error("cannot retrieve download URL")]
    NoDownloadUrl,

    #[error("data could not be parsed: {0}")]
    Parse(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Short text suitable for the `info` field of a download status.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Error::NoVersionInfo => "Cannot retrieve version info".to_string(),
            Error::NoDownloadUrl => "Cannot retrieve download URL".to_string(),
            Error::Parse(_) => "Data could not be parsed".to_string(),
            Error::Transport(_) => "Download failed, check your network".to_string(),
            Error::Storage(_) | Error::Json(_) | Error::Io(_) => {
                "Failed to save the tag database".to_string()
            }
            Error::Config(msg) => format!("Invalid configuration: {msg}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
