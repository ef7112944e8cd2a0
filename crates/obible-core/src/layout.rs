//! On-disk layout of the documents cache and the preference files.
//!
//! ```text
//! <documents>/Index/translations.json
//! <documents>/Index/checksum.json
//! <documents>/Translations/<abbrev>.json
//! <documents>/Checksums/<abbrev>
//! <prefs>/selection.json
//! <prefs>/options.json
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ObibleConfig;

pub const INDEX_DIR: &str = "Index";
pub const TRANSLATIONS_DIR: &str = "Translations";
pub const CHECKSUMS_DIR: &str = "Checksums";

/// Error for abbreviations that would escape the cache directories.
#[derive(Debug, thiserror::Error)]
#[error("invalid translation abbreviation: {0:?}")]
pub struct InvalidAbbrev(pub String);

/// Abbreviations become file names; only `[A-Za-z0-9_-]` is accepted.
pub fn validate_abbrev(abbrev: &str) -> std::result::Result<(), InvalidAbbrev> {
    let ok = !abbrev.is_empty()
        && abbrev
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(InvalidAbbrev(abbrev.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    documents: PathBuf,
    prefs: PathBuf,
}

impl Layout {
    pub fn new(documents: impl Into<PathBuf>, prefs: impl Into<PathBuf>) -> Self {
        Self {
            documents: documents.into(),
            prefs: prefs.into(),
        }
    }

    /// Documents under `~/.local/share/obible` (or `data_dir`), preferences
    /// under `~/.local/state/obible/prefs`.
    pub fn from_config(cfg: &ObibleConfig) -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("obible")?;
        let documents = match &cfg.data_dir {
            Some(dir) => dir.clone(),
            None => xdg_dirs.get_data_home().join("obible"),
        };
        let prefs = xdg_dirs.get_state_home().join("obible").join("prefs");
        Ok(Self::new(documents, prefs))
    }

    /// Both roots below a single directory. Used by tests and portable installs.
    pub fn under(root: &Path) -> Self {
        Self::new(root.join("documents"), root.join("prefs"))
    }

    pub fn documents(&self) -> &Path {
        &self.documents
    }

    pub fn prefs(&self) -> &Path {
        &self.prefs
    }

    pub fn index_dir(&self) -> PathBuf {
        self.documents.join(INDEX_DIR)
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.documents.join(TRANSLATIONS_DIR)
    }

    pub fn checksums_dir(&self) -> PathBuf {
        self.documents.join(CHECKSUMS_DIR)
    }

    pub fn translations_index_path(&self) -> PathBuf {
        self.index_dir().join("translations.json")
    }

    pub fn checksum_index_path(&self) -> PathBuf {
        self.index_dir().join("checksum.json")
    }

    pub fn translation_path(&self, abbrev: &str) -> PathBuf {
        self.translations_dir().join(format!("{abbrev}.json"))
    }

    /// Plain-text marker holding the published checksum the cached file was fetched at.
    pub fn checksum_path(&self, abbrev: &str) -> PathBuf {
        self.checksums_dir().join(abbrev)
    }

    pub fn pref_path(&self, name: &str) -> PathBuf {
        self.prefs.join(format!("{name}.json"))
    }

    /// Create every directory of the layout.
    pub fn ensure(&self) -> Result<()> {
        for dir in [
            self.index_dir(),
            self.translations_dir(),
            self.checksums_dir(),
            self.prefs.clone(),
        ] {
            fs::create_dir_all(&dir).with_context(|| format!("create dir: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Abbreviations of all cached translations, sorted.
    pub fn installed_translations(&self) -> Vec<String> {
        list_files(&self.translations_dir())
            .into_iter()
            .filter_map(|name| name.strip_suffix(".json").map(str::to_string))
            .filter(|abbrev| validate_abbrev(abbrev).is_ok())
            .collect()
    }

    /// Names of all checksum markers, sorted.
    pub fn checksum_markers(&self) -> Vec<String> {
        list_files(&self.checksums_dir())
            .into_iter()
            .filter(|name| validate_abbrev(name).is_ok())
            .collect()
    }

    pub fn is_installed(&self, abbrev: &str) -> bool {
        validate_abbrev(abbrev).is_ok() && self.translation_path(abbrev).is_file()
    }

    /// Nothing has been downloaded yet.
    pub fn is_first_launch(&self) -> bool {
        self.installed_translations().is_empty()
    }
}

/// Regular file names in `dir`, sorted. A missing directory lists as empty.
pub fn list_files(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %dir.display(), "could not list directory: {}", e);
            }
            return Vec::new();
        }
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_layout() {
        let layout = Layout::new("/data", "/prefs");
        assert_eq!(
            layout.translations_index_path(),
            PathBuf::from("/data/Index/translations.json")
        );
        assert_eq!(
            layout.checksum_index_path(),
            PathBuf::from("/data/Index/checksum.json")
        );
        assert_eq!(
            layout.translation_path("schlachter"),
            PathBuf::from("/data/Translations/schlachter.json")
        );
        assert_eq!(
            layout.checksum_path("schlachter"),
            PathBuf::from("/data/Checksums/schlachter")
        );
        assert_eq!(layout.pref_path("options"), PathBuf::from("/prefs/options.json"));
    }

    #[test]
    fn abbrev_validation_rejects_path_tricks() {
        assert!(validate_abbrev("kjv").is_ok());
        assert!(validate_abbrev("statenvertaling-a_1").is_ok());
        assert!(validate_abbrev("").is_err());
        assert!(validate_abbrev("../etc").is_err());
        assert!(validate_abbrev("a/b").is_err());
        assert!(validate_abbrev("x.json").is_err());
    }

    #[test]
    fn installed_translations_lists_json_stems_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::under(dir.path());
        assert!(layout.is_first_launch());

        layout.ensure().unwrap();
        fs::write(layout.translation_path("web"), "{}").unwrap();
        fs::write(layout.translation_path("kjv"), "{}").unwrap();
        fs::write(layout.translations_dir().join("notes.txt"), "x").unwrap();
        fs::create_dir_all(layout.translations_dir().join("nested.json")).unwrap();

        assert_eq!(layout.installed_translations(), vec!["kjv", "web"]);
        assert!(layout.is_installed("kjv"));
        assert!(!layout.is_installed("asv"));
        assert!(!layout.is_first_launch());
    }

    #[test]
    fn list_files_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(&dir.path().join("absent")).is_empty());
    }
}
