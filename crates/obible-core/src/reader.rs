//! Chapter rendering and book/chapter bounds.

use crate::model::Bible;

/// Title shown when a translation cannot be loaded.
pub const LOAD_ERROR_TITLE: &str = "ERROR";
pub const LOAD_ERROR_TEXT: &str = "Please try again\nCheck your internet connection";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterText {
    /// `"<translation> | <chapter name>"`.
    pub title: String,
    pub text: String,
}

pub fn book_names(bible: &Bible) -> Vec<String> {
    bible.books.iter().map(|b| b.name.clone()).collect()
}

/// `(last book index, last chapter index of `book`)`. Zero for anything absent.
pub fn counts(bible: &Bible, book: usize) -> (usize, usize) {
    let last_book = bible.books.len().saturating_sub(1);
    let last_chapter = bible
        .book(book)
        .map(|b| b.chapters.len().saturating_sub(1))
        .unwrap_or(0);
    (last_book, last_chapter)
}

/// With verse numbers every verse is its own trimmed `"<n> <text>"` line;
/// without them the verse texts run together as published.
pub fn chapter_text(
    bible: &Bible,
    book: usize,
    chapter: usize,
    show_verse_numbers: bool,
) -> Option<ChapterText> {
    let ch = bible.chapter(book, chapter)?;
    let text = if show_verse_numbers {
        ch.verses
            .iter()
            .map(|v| format!("{} {}", v.verse, v.text).trim().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        ch.verses.iter().map(|v| v.text.as_str()).collect()
    };
    Some(ChapterText {
        title: format!("{} | {}", bible.translation, ch.name),
        text,
    })
}

/// Cut `s` to `max` characters, ending in `.` when shortened. `max < 2` disables it.
pub fn shorten(s: &str, max: usize) -> String {
    if max >= 2 && s.chars().count() > max {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}.", head.trim())
    } else {
        s.to_string()
    }
}
