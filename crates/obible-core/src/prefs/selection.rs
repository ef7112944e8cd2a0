//! Current translation/book/chapter for the primary and split-screen readers.

use anyhow::Result;

use super::store::PrefStore;
use crate::layout::Layout;
use crate::model::{self, Bible};

pub const DEFAULT_TRANSLATION: &str = "schlachter";
/// John 3, zero-based.
pub const DEFAULT_BOOK: usize = 42;
pub const DEFAULT_CHAPTER: usize = 2;

const STORE_NAME: &str = "selection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Primary,
    Split,
}

impl Slot {
    fn key(self, base: &str) -> String {
        match self {
            Slot::Primary => base.to_string(),
            Slot::Split => format!("{base}_split"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub translation: String,
    pub book: usize,
    pub chapter: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            translation: DEFAULT_TRANSLATION.to_string(),
            book: DEFAULT_BOOK,
            chapter: DEFAULT_CHAPTER,
        }
    }
}

/// Fields to change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SelectionUpdate {
    pub translation: Option<String>,
    pub book: Option<usize>,
    pub chapter: Option<usize>,
}

pub struct SelectionStore {
    layout: Layout,
    prefs: PrefStore,
}

impl SelectionStore {
    pub fn open(layout: &Layout) -> Self {
        Self {
            layout: layout.clone(),
            prefs: PrefStore::open(&layout.pref_path(STORE_NAME)),
        }
    }

    fn load_bible(&self, abbrev: &str) -> Option<Bible> {
        if !self.layout.is_installed(abbrev) {
            return None;
        }
        model::load_bible(&self.layout.translation_path(abbrev))
    }

    fn get_index(&self, key: &str, default: usize) -> usize {
        usize::try_from(self.prefs.get_i64(key, default as i64)).unwrap_or(default)
    }

    /// Stored selection for `slot`. The default John 3 falls back to the
    /// first chapter when the installed translation has fewer books.
    pub fn get(&self, slot: Slot) -> Selection {
        let translation = self
            .prefs
            .get_string(&slot.key("translation"), DEFAULT_TRANSLATION);
        let mut book = self.get_index(&slot.key("book"), DEFAULT_BOOK);
        let mut chapter = self.get_index(&slot.key("chapter"), DEFAULT_CHAPTER);

        if book == DEFAULT_BOOK && chapter == DEFAULT_CHAPTER {
            if let Some(bible) = self.load_bible(&translation) {
                if book >= bible.books.len() {
                    book = 0;
                    chapter = 0;
                }
            }
        }
        Selection {
            translation,
            book,
            chapter,
        }
    }

    /// Clamp book and chapter into the bounds of the translation, if installed.
    pub fn check(&self, mut selection: Selection) -> Selection {
        if let Some(bible) = self.load_bible(&selection.translation) {
            if bible.books.is_empty() {
                selection.book = 0;
                selection.chapter = 0;
            } else {
                selection.book = selection.book.min(bible.books.len() - 1);
                let chapters = bible.books[selection.book].chapters.len();
                selection.chapter = selection.chapter.min(chapters.saturating_sub(1));
            }
        }
        selection
    }

    /// Merge `update` into the stored selection, clamp it, and persist only
    /// the fields that were given. Returns the effective selection.
    pub fn save(&mut self, slot: Slot, update: SelectionUpdate) -> Result<Selection> {
        let saved = self.get(slot);
        let merged = Selection {
            translation: update.translation.clone().unwrap_or(saved.translation),
            book: update.book.unwrap_or(saved.book),
            chapter: update.chapter.unwrap_or(saved.chapter),
        };
        let checked = self.check(merged);

        if update.translation.is_some() {
            self.prefs
                .put_string(&slot.key("translation"), checked.translation.clone());
        }
        if update.book.is_some() {
            self.prefs.put_i64(&slot.key("book"), checked.book as i64);
        }
        if update.chapter.is_some() {
            self.prefs.put_i64(&slot.key("chapter"), checked.chapter as i64);
        }
        self.prefs.commit()?;
        tracing::debug!(?slot, ?checked, "selection saved");
        Ok(checked)
    }

    /// Make sure `abbrev` is installed. Otherwise switch `slot` to the first
    /// installed translation; `None` when nothing is installed.
    pub fn check_translation(&mut self, slot: Slot, abbrev: &str) -> Result<Option<String>> {
        if self.layout.is_installed(abbrev) {
            return Ok(Some(abbrev.to_string()));
        }
        let Some(first) = self.layout.installed_translations().into_iter().next() else {
            return Ok(None);
        };
        tracing::info!(missing = abbrev, replacement = %first, "selected translation not installed");
        self.save(
            slot,
            SelectionUpdate {
                translation: Some(first.clone()),
                ..SelectionUpdate::default()
            },
        )?;
        Ok(Some(first))
    }
}
