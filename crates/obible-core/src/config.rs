use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/obible/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObibleConfig {
    /// Base URL of the translation API. `translations.json`, `checksum.json`
    /// and `<abbrev>.json` are resolved against it.
    pub api_base_url: String,
    /// The local index is refetched once it is older than this.
    pub index_max_age_secs: u64,
    /// Hide translations that carry the apocrypha from listings.
    pub hide_apocrypha: bool,
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole transfer; translations are a few MiB.
    pub timeout_secs: u64,
    /// Override for the documents directory (index, translations, checksums).
    pub data_dir: Option<PathBuf>,
    /// Where `obible backup` writes archives when `--dest` is not given.
    pub backup_dir: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for ObibleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.getbible.net/v2".to_string(),
            index_max_age_secs: 86_400,
            hide_apocrypha: true,
            connect_timeout_secs: 30,
            timeout_secs: 600,
            data_dir: None,
            backup_dir: None,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("obible")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ObibleConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ObibleConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ObibleConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ObibleConfig::default();
        assert_eq!(cfg.api_base_url, "https://api.getbible.net/v2");
        assert_eq!(cfg.index_max_age_secs, 86_400);
        assert!(cfg.hide_apocrypha);
        assert!(cfg.data_dir.is_none());
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ObibleConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ObibleConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.api_base_url, cfg.api_base_url);
        assert_eq!(parsed.index_max_age_secs, cfg.index_max_age_secs);
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            api_base_url = "http://127.0.0.1:8080/v2"
            hide_apocrypha = false
        "#;
        let cfg: ObibleConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:8080/v2");
        assert!(!cfg.hide_apocrypha);
        assert_eq!(cfg.index_max_age_secs, 86_400);
        assert_eq!(cfg.connect_timeout_secs, 30);
    }

    #[test]
    fn config_toml_retry_and_dirs() {
        let toml = r#"
            data_dir = "/srv/obible"
            backup_dir = "/home/reader/Download"

            [retry]
            max_attempts = 3
            base_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: ObibleConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/srv/obible")));
        assert_eq!(cfg.backup_dir, Some(PathBuf::from("/home/reader/Download")));
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 3);
        assert!((retry.base_delay_secs - 0.5).abs() < 1e-9);
        assert_eq!(retry.max_delay_secs, 15);
    }
}
