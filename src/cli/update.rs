use crate::config::SyncConfig;

use super::open_bootstrapped;

pub async fn run_update(config: SyncConfig) -> anyhow::Result<()> {
    let ctx = open_bootstrapped(config).await?;

    if !ctx.update_database().await? {
        println!("An update is already running");
        return Ok(());
    }

    let info = ctx.snapshot_info()?;
    println!();
    println!(
        "Updated tag database to {} ({} tags)",
        info.meta.sha.as_deref().unwrap_or("<unknown>"),
        info.tag_count
    );
    println!();
    Ok(())
}

pub async fn run_check(config: SyncConfig, json: bool) -> anyhow::Result<()> {
    let ctx = open_bootstrapped(config).await?;
    let result = ctx.check_version().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Local version:  {}", result.old.as_deref().unwrap_or("<none>"));
    println!("Latest version: {}", result.new);
    println!("Release:        {}", result.new_link);
    if result.has_update() {
        println!("An update is available. Run 'tagsync update' to download it.");
    } else {
        println!("Already up to date.");
    }
    Ok(())
}
