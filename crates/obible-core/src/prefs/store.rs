//! JSON-file key-value store, one file per preference group.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetch::temp_path;
use crate::model;

/// A preference group such as `selection` or `options`.
///
/// Reads take a default; writes are buffered until [`PrefStore::commit`],
/// which replaces the file atomically. Last write wins.
#[derive(Debug, Clone)]
pub struct PrefStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl PrefStore {
    /// Missing or corrupt files open as an empty store.
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            values: model::load_json_object(path).unwrap_or_default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.values.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    pub fn put_string(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), Value::Bool(value));
    }

    pub fn put_i64(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), Value::from(value));
    }

    pub fn put_f64(&mut self, key: &str, value: f64) {
        // NaN and infinities have no JSON form.
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.values.insert(key.to_string(), Value::Number(n));
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn commit(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values).context("serialize preferences")?;
        let tmp = temp_path(&self.path);
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("rename {} to {}", tmp.display(), self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefStore::open(&dir.path().join("options.json"));
        assert_eq!(store.get_string("theme", "System"), "System");
        assert!(store.get_bool("showVerseNumbers", true));
        assert_eq!(store.get_i64("book", 42), 42);
    }

    #[test]
    fn commit_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("selection.json");
        let mut store = PrefStore::open(&path);
        store.put_string("translation", "kjv");
        store.put_i64("book", 3);
        store.put_bool("flag", false);
        store.put_f64("size", 1.5);
        store.put_f64("nan", f64::NAN);
        store.commit().unwrap();

        let reopened = PrefStore::open(&path);
        assert_eq!(reopened.get_string("translation", "x"), "kjv");
        assert_eq!(reopened.get_i64("book", 0), 3);
        assert!(!reopened.get_bool("flag", true));
        assert!((reopened.get_f64("size", 0.0) - 1.5).abs() < 1e-9);
        assert!(!reopened.contains("nan"));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn wrong_types_and_corrupt_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, r#"{"theme": 3, "showVerseNumbers": "yes"}"#).unwrap();
        let store = PrefStore::open(&path);
        assert_eq!(store.get_string("theme", "System"), "System");
        assert!(store.get_bool("showVerseNumbers", true));

        fs::write(&path, "not json").unwrap();
        assert!(!PrefStore::open(&path).contains("theme"));
    }
}
