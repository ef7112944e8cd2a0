//! Checksum reconciliation between cached translations and the published index.
//!
//! Every cached translation has a marker under `Checksums/` holding the
//! checksum the index published when the file was fetched. A translation is
//! outdated when its marker no longer matches the index.

use anyhow::{Context, Result};
use std::fs;

use crate::cache::{remove_if_exists, TranslationCache, UNKNOWN_CHECKSUM};

/// Marker changes made by [`TranslationCache::clean_up_translations`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Markers whose translation no longer exists.
    pub removed_markers: Vec<String>,
    /// Translations that had no marker and got an `"unknown"` one.
    pub created_markers: Vec<String>,
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub outdated: Vec<String>,
    /// Re-downloaded successfully (only when updating).
    pub updated: Vec<String>,
    /// Re-download failures; the scan continues past them.
    pub failed: Vec<(String, anyhow::Error)>,
}

impl UpdateReport {
    pub fn update_available(&self) -> bool {
        !self.outdated.is_empty()
    }
}

impl TranslationCache {
    /// True if the translation is missing, has no marker, or its marker
    /// differs from the published checksum.
    pub fn check_update(&self, abbrev: &str) -> bool {
        if !self.layout().is_installed(abbrev) {
            return true;
        }
        match self.stored_checksum(abbrev) {
            None => true,
            Some(current) => current != self.published_checksum(abbrev),
        }
    }

    /// Drop markers without a translation and give unmarked translations an
    /// `"unknown"` marker.
    pub fn clean_up_translations(&self) -> Result<CleanupReport> {
        let layout = self.layout();
        let markers = layout.checksum_markers();
        let translations = layout.installed_translations();
        let mut report = CleanupReport::default();

        for marker in &markers {
            if !translations.contains(marker) && remove_if_exists(&layout.checksum_path(marker))? {
                report.removed_markers.push(marker.clone());
            }
        }
        if !translations.is_empty() {
            fs::create_dir_all(layout.checksums_dir())
                .with_context(|| format!("create dir: {}", layout.checksums_dir().display()))?;
        }
        for abbrev in &translations {
            if !markers.contains(abbrev) {
                let path = layout.checksum_path(abbrev);
                fs::write(&path, UNKNOWN_CHECKSUM)
                    .with_context(|| format!("write checksum marker {}", path.display()))?;
                report.created_markers.push(abbrev.clone());
            }
        }
        if report != CleanupReport::default() {
            tracing::debug!(
                removed = ?report.removed_markers,
                created = ?report.created_markers,
                "checksum markers reconciled"
            );
        }
        Ok(report)
    }

    /// Cached translations whose marker disagrees with the index, sorted.
    pub fn update_list(&self) -> Result<Vec<String>> {
        self.clean_up_translations()?;
        Ok(self
            .layout()
            .checksum_markers()
            .into_iter()
            .filter(|abbrev| self.check_update(abbrev))
            .collect())
    }

    /// Compute the update list and, if `update`, re-download every entry.
    pub fn check_for_updates(&self, update: bool) -> Result<UpdateReport> {
        let outdated = self.update_list()?;
        let mut report = UpdateReport {
            outdated,
            ..UpdateReport::default()
        };
        if update {
            for abbrev in &report.outdated {
                match self.download_translation(abbrev) {
                    Ok(()) => report.updated.push(abbrev.clone()),
                    Err(e) => {
                        tracing::warn!(abbrev = %abbrev, "update failed: {:#}", e);
                        report.failed.push((abbrev.clone(), e));
                    }
                }
            }
        }
        tracing::info!(
            outdated = report.outdated.len(),
            updated = report.updated.len(),
            failed = report.failed.len(),
            "update check finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObibleConfig;
    use crate::layout::Layout;

    fn setup() -> (tempfile::TempDir, TranslationCache) {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::under(dir.path());
        layout.ensure().unwrap();
        let cache = TranslationCache::new(layout, &ObibleConfig::default()).unwrap();
        (dir, cache)
    }

    fn install(cache: &TranslationCache, abbrev: &str, marker: Option<&str>) {
        fs::write(cache.layout().translation_path(abbrev), "{}").unwrap();
        if let Some(m) = marker {
            fs::write(cache.layout().checksum_path(abbrev), m).unwrap();
        }
    }

    fn publish(cache: &TranslationCache, json: &str) {
        fs::write(cache.layout().checksum_index_path(), json).unwrap();
    }

    #[test]
    fn check_update_rules() {
        let (_dir, cache) = setup();
        publish(&cache, r#"{"kjv": "aaa", "web": "bbb"}"#);
        install(&cache, "kjv", Some("aaa"));
        install(&cache, "web", Some("old"));
        install(&cache, "asv", None);

        assert!(!cache.check_update("kjv"));
        assert!(cache.check_update("web"));
        assert!(cache.check_update("asv"), "missing marker");
        assert!(cache.check_update("ylt"), "missing translation");
    }

    #[test]
    fn cleanup_removes_orphans_and_marks_unknown() {
        let (_dir, cache) = setup();
        install(&cache, "kjv", None);
        fs::write(cache.layout().checksum_path("gone"), "zzz").unwrap();

        let report = cache.clean_up_translations().unwrap();
        assert_eq!(report.removed_markers, vec!["gone"]);
        assert_eq!(report.created_markers, vec!["kjv"]);
        assert_eq!(cache.stored_checksum("kjv").as_deref(), Some(UNKNOWN_CHECKSUM));
        assert!(!cache.layout().checksum_path("gone").exists());

        assert_eq!(cache.clean_up_translations().unwrap(), CleanupReport::default());
    }

    #[test]
    fn update_list_reports_mismatches_sorted() {
        let (_dir, cache) = setup();
        publish(&cache, r#"{"kjv": "aaa", "web": "bbb", "asv": "ccc"}"#);
        install(&cache, "web", Some("old"));
        install(&cache, "kjv", Some("aaa"));
        install(&cache, "asv", None);

        assert_eq!(cache.update_list().unwrap(), vec!["asv", "web"]);
    }

    #[test]
    fn unknown_markers_match_a_missing_index() {
        let (_dir, cache) = setup();
        install(&cache, "kjv", None);
        // Without a checksum index both sides read "unknown".
        assert!(cache.update_list().unwrap().is_empty());
    }

    #[test]
    fn check_without_update_downloads_nothing() {
        let (_dir, cache) = setup();
        publish(&cache, r#"{"kjv": "new"}"#);
        install(&cache, "kjv", Some("old"));

        let report = cache.check_for_updates(false).unwrap();
        assert!(report.update_available());
        assert_eq!(report.outdated, vec!["kjv"]);
        assert!(report.updated.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(cache.stored_checksum("kjv").as_deref(), Some("old"));
    }
}
