//! `obible search <query>` – search the primary translation.

use anyhow::{bail, Result};
use obible_core::prefs::{SelectionStore, SelectionUpdate, Slot};
use obible_core::reader::shorten;
use obible_core::search::search_text;

use super::to_index;
use crate::cli::AppContext;

const LABEL_WIDTH: usize = 100;

pub fn run_search(ctx: &AppContext, query: &str, open: Option<usize>) -> Result<()> {
    let mut store = SelectionStore::open(&ctx.layout);
    let selection = store.get(Slot::Primary);
    let Some(abbrev) = store.check_translation(Slot::Primary, &selection.translation)? else {
        bail!("no translations installed; run `obible install <abbrev>`");
    };
    let Some(bible) = ctx.cache.load(&abbrev) else {
        bail!("{abbrev} could not be loaded");
    };

    let hits = search_text(&bible, query);
    if let Some(n) = open {
        let Some(hit) = hits.get(to_index(n, "result")?) else {
            bail!("result {n} out of range ({} results)", hits.len());
        };
        store.save(
            Slot::Primary,
            SelectionUpdate {
                translation: Some(abbrev),
                book: Some(hit.book),
                chapter: Some(hit.chapter),
            },
        )?;
        println!("Selected {}", shorten(&hit.label, LABEL_WIDTH));
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for (i, hit) in hits.iter().enumerate() {
        println!("{:>4}  {}", i + 1, shorten(&hit.label, LABEL_WIDTH));
    }
    Ok(())
}
