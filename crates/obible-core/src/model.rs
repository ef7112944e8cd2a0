//! Typed records for translation documents and the remote index.
//!
//! Loaders are deliberately forgiving: a missing or unparseable file yields
//! `None` and the caller falls back to its default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Translations bundling the apocrypha; hidden from listings by default.
pub const APOCRYPHA: &[&str] = &["kjva", "statenvertalinga"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(default)]
    pub name: String,
    pub verse: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,
    pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub name: String,
    pub chapters: Vec<Chapter>,
}

/// A full translation document (`<abbrev>.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bible {
    pub abbreviation: String,
    #[serde(rename = "distribution_about", default)]
    pub about: String,
    #[serde(rename = "distribution_license", default)]
    pub license: String,
    pub translation: String,
    pub books: Vec<Book>,
}

impl Bible {
    pub fn book(&self, book: usize) -> Option<&Book> {
        self.books.get(book)
    }

    pub fn chapter(&self, book: usize, chapter: usize) -> Option<&Chapter> {
        self.books.get(book)?.chapters.get(chapter)
    }
}

/// One entry of the remote index (`translations.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub abbreviation: String,
    #[serde(rename = "distribution_about", default)]
    pub about: String,
    #[serde(rename = "distribution_license", default)]
    pub license: String,
    pub translation: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub sha: String,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), "could not read: {}", e);
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring unparseable JSON: {}", e);
            None
        }
    }
}

pub fn load_bible(path: &Path) -> Option<Bible> {
    read_json(path)
}

pub fn load_translations(path: &Path) -> Option<BTreeMap<String, Translation>> {
    read_json(path)
}

/// Untyped JSON object, e.g. the checksum index (`{"kjv": "<sha>", ...}`).
pub fn load_json_object(path: &Path) -> Option<Map<String, Value>> {
    read_json(path)
}

pub fn remove_apocrypha(mut map: BTreeMap<String, Translation>) -> BTreeMap<String, Translation> {
    map.retain(|key, _| !APOCRYPHA.contains(&key.as_str()));
    map
}
