//! `obible checksum <abbrev>` – SHA-256 of a cached translation next to its markers.

use anyhow::{bail, Result};
use obible_core::checksum::translation_digest;
use obible_core::layout::validate_abbrev;

use crate::cli::AppContext;

pub fn run_checksum(ctx: &AppContext, abbrev: &str) -> Result<()> {
    validate_abbrev(abbrev)?;
    let Some(digest) = translation_digest(&ctx.layout, abbrev)? else {
        bail!("{abbrev} is not installed");
    };
    println!("sha256     {digest}");
    println!("stored     {}", ctx.cache.stored_checksum(abbrev).unwrap_or_else(|| "-".into()));
    println!("published  {}", ctx.cache.published_checksum(abbrev));
    Ok(())
}
