//! `obible restore <archive>` – restore a backup archive.

use anyhow::Result;
use obible_core::backup::{restore_documents, restore_preferences};
use std::path::Path;

use crate::cli::AppContext;

pub fn run_restore(ctx: &AppContext, path: &Path, preferences: bool) -> Result<()> {
    let extracted = if preferences {
        restore_preferences(&ctx.layout, path)?
    } else {
        restore_documents(&ctx.layout, path)?
    };
    println!("Restored {extracted} file(s) from {}", path.display());
    Ok(())
}
