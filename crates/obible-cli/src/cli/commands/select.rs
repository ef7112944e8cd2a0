//! `obible select <translation>` – walk the translation → book → chapter flow.

use anyhow::{bail, Result};
use obible_core::navigation::SelectionFlow;
use obible_core::prefs::SelectionStore;

use super::{slot, to_index};
use crate::cli::AppContext;

pub fn run_select(
    ctx: &AppContext,
    translation: &str,
    book: usize,
    chapter: usize,
    split: bool,
) -> Result<()> {
    let slot = slot(split);
    if !ctx.layout.is_installed(translation) {
        bail!("{translation} is not installed; run `obible install {translation}`");
    }
    let Some(bible) = ctx.cache.load(translation) else {
        bail!("{translation} could not be loaded");
    };

    let mut store = SelectionStore::open(&ctx.layout);
    let mut flow = SelectionFlow::new(slot, store.get(slot));
    flow.pick_translation(translation)?;
    flow.pick_book(&bible, to_index(book, "book")?)?;
    let saved = flow.pick_chapter(&bible, to_index(chapter, "chapter")?, &mut store)?;

    let name = bible.book(saved.book).map(|b| b.name.as_str()).unwrap_or("?");
    println!("Selected {} {} {}", saved.translation, name, saved.chapter + 1);
    Ok(())
}
