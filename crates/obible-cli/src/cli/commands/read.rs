//! `obible read` – print the selected chapter.

use anyhow::{bail, Result};
use obible_core::navigation::{self, Screen};
use obible_core::prefs::{Options, SelectionStore, SelectionUpdate, Slot};
use obible_core::reader::{self, LOAD_ERROR_TEXT, LOAD_ERROR_TITLE};

use super::{slot, to_index};
use crate::cli::AppContext;

pub struct ReadArgs {
    pub split: bool,
    pub translation: Option<String>,
    pub book: Option<usize>,
    pub chapter: Option<usize>,
    pub next: bool,
    pub prev: bool,
}

pub async fn run_read(ctx: &AppContext, args: ReadArgs) -> Result<()> {
    if navigation::startup_screen(&ctx.layout) == Screen::Start {
        println!("No translations installed yet.");
        println!("Run `obible index`, `obible list` and `obible install <abbrev>` to get started.");
        return Ok(());
    }

    let options = Options::load(&ctx.layout);
    if options.check_at_startup {
        notify_updates(ctx).await;
    }

    let slot = slot(args.split);
    let mut store = SelectionStore::open(&ctx.layout);
    apply_selection(ctx, &mut store, slot, &args)?;

    let mut selection = store.get(slot);
    let Some(abbrev) = store.check_translation(slot, &selection.translation)? else {
        println!("No translations installed yet.");
        return Ok(());
    };
    selection.translation = abbrev;

    let Some(bible) = ctx.cache.load(&selection.translation) else {
        println!("{LOAD_ERROR_TITLE}\n\n{LOAD_ERROR_TEXT}");
        return Ok(());
    };

    let mut selection = store.check(selection);
    if args.next || args.prev {
        let (book, chapter) =
            navigation::turn_chapter(&bible, selection.book, selection.chapter, args.next);
        selection = store.save(
            slot,
            SelectionUpdate {
                translation: None,
                book: Some(book),
                chapter: Some(chapter),
            },
        )?;
    }

    match reader::chapter_text(&bible, selection.book, selection.chapter, options.show_verse_numbers) {
        Some(chapter) => println!("{}\n\n{}", chapter.title, chapter.text),
        None => println!("{LOAD_ERROR_TITLE}\n\n{LOAD_ERROR_TEXT}"),
    }
    Ok(())
}

/// Store `--translation`, `--book` and `--chapter` before reading.
fn apply_selection(
    ctx: &AppContext,
    store: &mut SelectionStore,
    slot: Slot,
    args: &ReadArgs,
) -> Result<()> {
    if args.translation.is_none() && args.book.is_none() && args.chapter.is_none() {
        return Ok(());
    }
    if let Some(t) = &args.translation {
        if !ctx.layout.is_installed(t) {
            bail!("{t} is not installed; run `obible install {t}`");
        }
    }
    let book = args.book.map(|b| to_index(b, "book")).transpose()?;
    let chapter = args.chapter.map(|c| to_index(c, "chapter")).transpose()?;
    store.save(
        slot,
        SelectionUpdate {
            translation: args.translation.clone(),
            // A new book starts at its first chapter unless one is given.
            chapter: chapter.or(book.map(|_| 0)),
            book,
        },
    )?;
    Ok(())
}

/// Refresh the index and report outdated translations. Failures only log.
async fn notify_updates(ctx: &AppContext) {
    let cache = ctx.cache.clone();
    let result = tokio::task::spawn_blocking(move || {
        cache.refresh_index(false)?;
        cache.check_for_updates(false)
    })
    .await;
    match result {
        Ok(Ok(report)) if report.update_available() => {
            eprintln!(
                "Updates available for {}. Run `obible update`.",
                report.outdated.join(", ")
            );
        }
        Ok(Ok(_)) => {}
        Ok(Err(e)) => tracing::warn!("update check failed: {:#}", e),
        Err(e) => tracing::warn!("update check task failed: {}", e),
    }
}
