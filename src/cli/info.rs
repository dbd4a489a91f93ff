use crate::config::SyncConfig;

use super::open_bootstrapped;

pub async fn run_info(config: SyncConfig, json: bool) -> anyhow::Result<()> {
    let ctx = open_bootstrapped(config).await?;
    let info = ctx.snapshot_info()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let meta = &info.meta;
    println!();
    println!("Tag Database Status");
    println!("{}", "─".repeat(19));
    println!("Version:      {}", meta.sha.as_deref().unwrap_or("<none>"));
    println!(
        "Updated:      {}",
        meta.update_time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "<never>".to_string())
    );
    println!("Release:      {}", meta.release_link.as_deref().unwrap_or("<none>"));
    println!(
        "Schema:       {}",
        meta.data_structure_version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );
    println!("Tags:         {}", info.tag_count);
    println!("Lookups:      {}", info.lookup_count);
    if !info.badge.is_empty() {
        println!("Status:       {} {}", info.badge, info.status.info);
    }
    println!();

    Ok(())
}
