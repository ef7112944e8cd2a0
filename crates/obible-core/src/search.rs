//! Linear text search over a loaded translation.

use crate::model::Bible;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub book: usize,
    pub chapter: usize,
    pub verse: u32,
    /// `"<book> <chapter>:<verse> <text>"`, chapter counted from 1.
    pub label: String,
}

/// Case-insensitive substring match against every verse, in canonical order.
pub fn search_text(bible: &Bible, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for (b, book) in bible.books.iter().enumerate() {
        for (c, chapter) in book.chapters.iter().enumerate() {
            for verse in &chapter.verses {
                if verse.text.to_lowercase().contains(&needle) {
                    hits.push(SearchHit {
                        book: b,
                        chapter: c,
                        verse: verse.verse,
                        label: format!("{} {}:{} {}", book.name, c + 1, verse.verse, verse.text.trim()),
                    });
                }
            }
        }
    }
    tracing::debug!(query, hits = hits.len(), "search finished");
    hits
}
