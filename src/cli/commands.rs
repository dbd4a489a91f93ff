use std::path::PathBuf;

use clap::Args;

use crate::config::SyncConfig;

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Data directory for the tag database
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// TOML config file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Release feed URL (JSON endpoint for the latest release)
    #[arg(long, env = "TAGSYNC_FEED_URL")]
    pub feed_url: Option<String>,
}

impl CommonArgs {
    pub fn load_config(&self) -> anyhow::Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::load(path)?,
            None => SyncConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(feed_url) = &self.feed_url {
            config.release_feed_url = feed_url.clone();
        }

        Ok(config)
    }
}
