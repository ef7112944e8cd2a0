//! Screen routing and the translation → book → chapter selection flow.

use anyhow::{bail, Result};

use crate::layout::Layout;
use crate::model::Bible;
use crate::prefs::{Selection, SelectionStore, SelectionUpdate, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// First launch: nothing downloaded yet.
    Start,
    Read,
    Selection,
    Search,
    Settings,
    Bookmarks,
}

pub fn startup_screen(layout: &Layout) -> Screen {
    if layout.is_first_launch() {
        Screen::Start
    } else {
        Screen::Read
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    Translation,
    Book,
    Chapter,
}

/// Step-by-step selection. Nothing is persisted until a chapter is picked.
#[derive(Debug, Clone)]
pub struct SelectionFlow {
    slot: Slot,
    mode: SelectMode,
    pending: Selection,
}

impl SelectionFlow {
    pub fn new(slot: Slot, current: Selection) -> Self {
        Self {
            slot,
            mode: SelectMode::Translation,
            pending: current,
        }
    }

    /// Start at the book list, keeping the current translation.
    pub fn from_book(slot: Slot, current: Selection) -> Self {
        Self {
            mode: SelectMode::Book,
            ..Self::new(slot, current)
        }
    }

    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    pub fn pending(&self) -> &Selection {
        &self.pending
    }

    /// Choosing a translation restarts at its first book and chapter.
    pub fn pick_translation(&mut self, abbrev: &str) -> Result<()> {
        if self.mode != SelectMode::Translation {
            bail!("expected a {:?} choice, got a translation", self.mode);
        }
        self.pending = Selection {
            translation: abbrev.to_string(),
            book: 0,
            chapter: 0,
        };
        self.mode = SelectMode::Book;
        Ok(())
    }

    pub fn pick_book(&mut self, bible: &Bible, book: usize) -> Result<()> {
        if self.mode != SelectMode::Book {
            bail!("expected a {:?} choice, got a book", self.mode);
        }
        if book >= bible.books.len() {
            bail!("book {} out of range (translation has {})", book + 1, bible.books.len());
        }
        self.pending.book = book;
        self.pending.chapter = 0;
        self.mode = SelectMode::Chapter;
        Ok(())
    }

    /// Final step: stores the selection and returns what was saved.
    pub fn pick_chapter(
        self,
        bible: &Bible,
        chapter: usize,
        store: &mut SelectionStore,
    ) -> Result<Selection> {
        if self.mode != SelectMode::Chapter {
            bail!("expected a {:?} choice, got a chapter", self.mode);
        }
        let chapters = bible
            .book(self.pending.book)
            .map(|b| b.chapters.len())
            .unwrap_or(0);
        if chapter >= chapters {
            bail!("chapter {} out of range (book has {})", chapter + 1, chapters);
        }
        store.save(
            self.slot,
            SelectionUpdate {
                translation: Some(self.pending.translation),
                book: Some(self.pending.book),
                chapter: Some(chapter),
            },
        )
    }

    /// Step back one mode. Returns false when already at the first mode.
    pub fn back(&mut self) -> bool {
        self.mode = match self.mode {
            SelectMode::Translation => return false,
            SelectMode::Book => SelectMode::Translation,
            SelectMode::Chapter => SelectMode::Book,
        };
        true
    }
}

/// Next or previous chapter, crossing book boundaries and wrapping around
/// both ends of the translation.
pub fn turn_chapter(bible: &Bible, book: usize, chapter: usize, next: bool) -> (usize, usize) {
    let last_chapter = |b: usize| {
        bible
            .book(b)
            .map(|bk| bk.chapters.len().saturating_sub(1))
            .unwrap_or(0)
    };
    let last_book = bible.books.len().saturating_sub(1);
    let book = book.min(last_book);
    let chapter = chapter.min(last_chapter(book));

    if next {
        if chapter < last_chapter(book) {
            (book, chapter + 1)
        } else if book < last_book {
            (book + 1, 0)
        } else {
            (0, 0)
        }
    } else if chapter > 0 {
        (book, chapter - 1)
    } else if book > 0 {
        (book - 1, last_chapter(book - 1))
    } else {
        (last_book, last_chapter(last_book))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::sample_bible;

    #[test]
    fn startup_goes_to_start_until_something_is_installed() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::under(dir.path());
        assert_eq!(startup_screen(&layout), Screen::Start);
        layout.ensure().unwrap();
        std::fs::write(layout.translation_path("kjv"), "{}").unwrap();
        assert_eq!(startup_screen(&layout), Screen::Read);
    }

    #[test]
    fn turn_chapter_crosses_books_and_wraps() {
        let bible = sample_bible();
        assert_eq!(turn_chapter(&bible, 0, 0, true), (0, 1));
        assert_eq!(turn_chapter(&bible, 0, 1, true), (1, 0));
        assert_eq!(turn_chapter(&bible, 1, 0, true), (0, 0));
        assert_eq!(turn_chapter(&bible, 1, 0, false), (0, 1));
        assert_eq!(turn_chapter(&bible, 0, 1, false), (0, 0));
        assert_eq!(turn_chapter(&bible, 0, 0, false), (1, 0));
    }

    #[test]
    fn flow_walks_modes_and_saves_on_chapter() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::under(dir.path());
        layout.ensure().unwrap();
        let bible = sample_bible();
        std::fs::write(
            layout.translation_path("sample"),
            serde_json::to_string(&bible).unwrap(),
        )
        .unwrap();
        let mut store = SelectionStore::open(&layout);

        let mut flow = SelectionFlow::new(Slot::Split, store.get(Slot::Split));
        assert_eq!(flow.mode(), SelectMode::Translation);
        assert!(flow.pick_book(&bible, 0).is_err());
        flow.pick_translation("sample").unwrap();
        assert_eq!(flow.mode(), SelectMode::Book);
        assert!(flow.pick_book(&bible, 2).is_err());
        flow.pick_book(&bible, 0).unwrap();
        assert!(flow.back());
        flow.pick_book(&bible, 1).unwrap();
        assert_eq!(flow.mode(), SelectMode::Chapter);

        let saved = flow.pick_chapter(&bible, 0, &mut store).unwrap();
        assert_eq!(saved.translation, "sample");
        assert_eq!((saved.book, saved.chapter), (1, 0));
        assert_eq!(store.get(Slot::Split), saved);
        assert_eq!(store.get(Slot::Primary).translation, crate::prefs::DEFAULT_TRANSLATION);
    }

    #[test]
    fn back_stops_at_translation() {
        let mut flow = SelectionFlow::new(Slot::Primary, Selection::default());
        assert!(!flow.back());
        let mut flow = SelectionFlow::from_book(Slot::Primary, Selection::default());
        assert_eq!(flow.mode(), SelectMode::Book);
        assert!(flow.back());
        assert_eq!(flow.mode(), SelectMode::Translation);
    }
}
