//! `obible remove <abbrev>` – delete a cached translation.

use anyhow::Result;

use crate::cli::AppContext;

pub fn run_remove(ctx: &AppContext, abbrev: &str) -> Result<()> {
    if ctx.cache.delete_translation(abbrev)? {
        println!("Removed {abbrev}");
    } else {
        println!("{abbrev} is not installed");
    }
    Ok(())
}
