//! Download/cache manager for the translation index and translation documents.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use url::Url;

use crate::config::ObibleConfig;
use crate::fetch::{self, FetchOptions};
use crate::layout::{validate_abbrev, Layout};
use crate::model::{self, Bible, Translation};

/// Marker content when the published checksum is not known.
pub const UNKNOWN_CHECKSUM: &str = "unknown";

#[derive(Debug, Clone)]
pub struct TranslationCache {
    layout: Layout,
    api_base: Url,
    fetch: FetchOptions,
    index_max_age: Duration,
}

impl TranslationCache {
    pub fn new(layout: Layout, cfg: &ObibleConfig) -> Result<Self> {
        let mut base = cfg.api_base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_base =
            Url::parse(&base).with_context(|| format!("invalid api_base_url: {}", cfg.api_base_url))?;
        Ok(Self {
            layout,
            api_base,
            fetch: FetchOptions::from_config(cfg),
            index_max_age: Duration::from_secs(cfg.index_max_age_secs),
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        self.api_base
            .join(name)
            .with_context(|| format!("build url for {name}"))
    }

    fn download(&self, name: &str, dest: &Path) -> Result<u64> {
        let url = self.endpoint(name)?;
        let written = fetch::fetch_with_retry(url.as_str(), dest, &self.fetch)
            .with_context(|| format!("download {url}"))?;
        Ok(written)
    }

    /// Fetch `translations.json` and `checksum.json` into the index directory.
    pub fn save_index(&self) -> Result<()> {
        self.layout.ensure()?;
        self.download("translations.json", &self.layout.translations_index_path())?;
        self.download("checksum.json", &self.layout.checksum_index_path())?;
        tracing::info!("translation index saved");
        Ok(())
    }

    /// Refetch the index when forced, when either file is missing, or when
    /// either is older than the configured maximum age. Returns whether it fetched.
    pub fn refresh_index(&self, force: bool) -> Result<bool> {
        let stale = [
            self.layout.translations_index_path(),
            self.layout.checksum_index_path(),
        ]
        .iter()
        .any(|path| is_stale(path, self.index_max_age));
        if !force && !stale {
            tracing::debug!("index is fresh");
            return Ok(false);
        }
        self.save_index()?;
        Ok(true)
    }

    /// The cached index, optionally without apocrypha translations.
    pub fn translations(&self, hide_apocrypha: bool) -> Option<BTreeMap<String, Translation>> {
        let map = model::load_translations(&self.layout.translations_index_path())?;
        Some(if hide_apocrypha {
            model::remove_apocrypha(map)
        } else {
            map
        })
    }

    /// Checksum published for `abbrev` in the cached checksum index, or `"unknown"`.
    pub fn published_checksum(&self, abbrev: &str) -> String {
        let Some(obj) = model::load_json_object(&self.layout.checksum_index_path()) else {
            return UNKNOWN_CHECKSUM.to_string();
        };
        match obj.get(abbrev) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => UNKNOWN_CHECKSUM.to_string(),
        }
    }

    /// Stored marker for a cached translation, if any.
    pub fn stored_checksum(&self, abbrev: &str) -> Option<String> {
        fs::read_to_string(self.layout.checksum_path(abbrev))
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Download `<abbrev>.json`, check that it parses, and record the published
    /// checksum it was fetched at.
    pub fn download_translation(&self, abbrev: &str) -> Result<()> {
        validate_abbrev(abbrev)?;
        self.layout.ensure()?;
        let dest = self.layout.translation_path(abbrev);
        // Staged next to the cached copy, which stays in place until the new body parses.
        let staged = fetch::temp_path(&dest);
        let bytes = self.download(&format!("{abbrev}.json"), &staged)?;

        if model::load_bible(&staged).is_none() {
            remove_if_exists(&staged)?;
            anyhow::bail!("downloaded {abbrev}.json is not a valid translation document");
        }
        fs::rename(&staged, &dest)
            .with_context(|| format!("move {} into place", dest.display()))?;

        let checksum = self.published_checksum(abbrev);
        let marker = self.layout.checksum_path(abbrev);
        fs::write(&marker, &checksum)
            .with_context(|| format!("write checksum marker {}", marker.display()))?;
        tracing::info!(abbrev, bytes, checksum = %checksum, "translation downloaded");
        Ok(())
    }

    /// Remove a cached translation and its marker. Returns whether the translation existed.
    pub fn delete_translation(&self, abbrev: &str) -> Result<bool> {
        validate_abbrev(abbrev)?;
        let existed = remove_if_exists(&self.layout.translation_path(abbrev))?;
        remove_if_exists(&self.layout.checksum_path(abbrev))?;
        if existed {
            tracing::info!(abbrev, "translation deleted");
        }
        Ok(existed)
    }

    pub fn load(&self, abbrev: &str) -> Option<Bible> {
        if validate_abbrev(abbrev).is_err() {
            return None;
        }
        model::load_bible(&self.layout.translation_path(abbrev))
    }

    pub fn installed(&self) -> Vec<String> {
        self.layout.installed_translations()
    }

    pub fn is_first_launch(&self) -> bool {
        self.layout.is_first_launch()
    }
}

fn is_stale(path: &Path, max_age: Duration) -> bool {
    let modified = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return true,
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age > max_age)
        .unwrap_or(false)
}

pub(crate) fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
    }
}
