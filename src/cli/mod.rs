mod commands;
mod info;
mod tags;
mod update;

pub use commands::CommonArgs;
pub use info::run_info;
pub use tags::{run_lookup, run_suggest};
pub use update::{run_check, run_update};

use std::sync::Arc;

use crate::config::SyncConfig;
use crate::context::SyncContext;
use crate::store::{SqliteStore, Store};

/// Opens (creating if needed) the data directory and builds the sync context.
pub fn open_context(config: SyncConfig) -> anyhow::Result<Arc<SyncContext>> {
    std::fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    Ok(Arc::new(SyncContext::new(config, Arc::new(store))?))
}

/// Opens the context and loads stored or bundled tag data. A failed load is
/// logged and the context is returned with whatever it holds.
pub async fn open_bootstrapped(config: SyncConfig) -> anyhow::Result<Arc<SyncContext>> {
    let ctx = open_context(config)?;
    if let Err(e) = ctx.bootstrap().await {
        tracing::error!("Failed to load tag data: {e}");
    }
    Ok(ctx)
}
