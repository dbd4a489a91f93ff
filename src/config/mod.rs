mod sync;

pub use sync::{
    DEFAULT_RELEASE_FEED_URL, FALLBACK_RELEASE_LINK, SCHEMA_VERSION, SyncConfig,
};
