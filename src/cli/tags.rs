use crate::config::SyncConfig;

use super::open_bootstrapped;

pub async fn run_lookup(config: SyncConfig, tag: String) -> anyhow::Result<()> {
    let ctx = open_bootstrapped(config).await?;

    match ctx.lookup(&tag) {
        Some(name) => {
            println!("{name}");
            Ok(())
        }
        None => anyhow::bail!("No translation for '{tag}'"),
    }
}

pub async fn run_suggest(config: SyncConfig, query: String, limit: usize, json: bool) -> anyhow::Result<()> {
    let ctx = open_bootstrapped(config).await?;
    let tags = ctx.suggest(&query, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
        return Ok(());
    }

    if tags.is_empty() {
        println!("No matching tags");
        return Ok(());
    }

    for tag in tags {
        println!("{:<40} {}", tag.search, tag.name);
    }
    Ok(())
}
