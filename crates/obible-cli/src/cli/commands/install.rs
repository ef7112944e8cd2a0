//! `obible install <abbrev>...` – download translations.

use anyhow::{bail, Result};
use obible_core::layout::validate_abbrev;

use crate::cli::AppContext;

pub async fn run_install(ctx: &AppContext, abbrevs: &[String]) -> Result<()> {
    for abbrev in abbrevs {
        validate_abbrev(abbrev)?;
    }
    let cache = ctx.cache.clone();
    let abbrevs = abbrevs.to_vec();
    let failed = tokio::task::spawn_blocking(move || {
        // Markers need the published checksums; a stale index is not fatal.
        if let Err(e) = cache.refresh_index(false) {
            tracing::warn!("index refresh failed: {:#}", e);
        }
        let mut failed = Vec::new();
        for abbrev in &abbrevs {
            match cache.download_translation(abbrev) {
                Ok(()) => println!("Installed {abbrev}"),
                Err(e) => {
                    eprintln!("Failed to install {abbrev}: {e:#}");
                    failed.push(abbrev.clone());
                }
            }
        }
        failed
    })
    .await?;

    if !failed.is_empty() {
        bail!("{} translation(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}
