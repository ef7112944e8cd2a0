//! `obible update` – reconcile cached translations against the published checksums.

use anyhow::{bail, Result};

use crate::cli::AppContext;

pub async fn run_update(ctx: &AppContext, check_only: bool) -> Result<()> {
    let cache = ctx.cache.clone();
    let report = tokio::task::spawn_blocking(move || {
        if let Err(e) = cache.refresh_index(false) {
            tracing::warn!("index refresh failed: {:#}", e);
        }
        cache.check_for_updates(!check_only)
    })
    .await??;

    if !report.update_available() {
        println!("All translations are up to date.");
        return Ok(());
    }
    if check_only {
        println!("Updates available: {}", report.outdated.join(", "));
        return Ok(());
    }
    for abbrev in &report.updated {
        println!("Updated {abbrev}");
    }
    for (abbrev, e) in &report.failed {
        eprintln!("Failed to update {abbrev}: {e:#}");
    }
    if !report.failed.is_empty() {
        bail!("{} update(s) failed", report.failed.len());
    }
    Ok(())
}
