//! `obible settings [key value]` – show or change options.

use anyhow::Result;
use obible_core::prefs::Options;

use crate::cli::AppContext;

pub fn run_settings(ctx: &AppContext, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut options = Options::load(&ctx.layout);
    if let (Some(key), Some(value)) = (key, value) {
        options.set(key, value)?;
        options.save(&ctx.layout)?;
        tracing::info!(key, value, "option changed");
    }
    for (k, v) in options.entries() {
        println!("{k:<18} {v}");
    }
    Ok(())
}
