//! `obible books` – list books of the selected translation.

use anyhow::{bail, Result};
use obible_core::prefs::SelectionStore;
use obible_core::reader;

use super::slot;
use crate::cli::AppContext;

pub fn run_books(ctx: &AppContext, split: bool) -> Result<()> {
    let slot = slot(split);
    let mut store = SelectionStore::open(&ctx.layout);
    let selection = store.get(slot);
    let Some(abbrev) = store.check_translation(slot, &selection.translation)? else {
        bail!("no translations installed; run `obible install <abbrev>`");
    };
    let Some(bible) = ctx.cache.load(&abbrev) else {
        bail!("{abbrev} could not be loaded");
    };
    for (i, name) in reader::book_names(&bible).iter().enumerate() {
        let (_, last_chapter) = reader::counts(&bible, i);
        let marker = if i == selection.book { "*" } else { " " };
        println!("{marker}{:>3} {} ({} chapters)", i + 1, name, last_chapter + 1);
    }
    Ok(())
}
