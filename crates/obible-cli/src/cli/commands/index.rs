//! `obible index` – refresh the cached translation index.

use anyhow::Result;

use crate::cli::AppContext;

pub async fn run_index(ctx: &AppContext, force: bool) -> Result<()> {
    let cache = ctx.cache.clone();
    let fetched = tokio::task::spawn_blocking(move || cache.refresh_index(force)).await??;
    if fetched {
        println!("Index downloaded.");
    } else {
        println!("Index is up to date.");
    }
    Ok(())
}
