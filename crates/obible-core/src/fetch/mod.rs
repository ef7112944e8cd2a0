//! Single-stream HTTP GET of index and translation documents.
//!
//! The body lands in `<dest>.part` and is renamed onto `dest` only after a
//! complete 2xx transfer, so a failed download never clobbers a good cache entry.

mod error;

pub use error::FetchError;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ObibleConfig;
use crate::retry::{self, RetryPolicy};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from_config(&ObibleConfig::default())
    }
}

impl FetchOptions {
    pub fn from_config(cfg: &ObibleConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            retry: cfg
                .retry
                .as_ref()
                .map(RetryPolicy::from_config)
                .unwrap_or_default(),
        }
    }
}

/// Path for the temp file: appends `.part` (e.g. `kjv.json` → `kjv.json.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Downloads `url` into `dest` with a single GET, following redirects.
/// Returns the number of bytes written.
pub fn fetch_to_file(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let tmp = temp_path(dest);
    let result = transfer(url, &tmp, opts).and_then(|written| {
        fs::rename(&tmp, dest)?;
        Ok(written)
    });
    if result.is_err() {
        match fs::remove_file(&tmp) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %tmp.display(), "could not remove temp file: {}", e),
        }
    }
    result
}

/// `fetch_to_file` under the retry policy in `opts`.
pub fn fetch_with_retry(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let written = retry::run_with_retry(&opts.retry, || fetch_to_file(url, dest, opts))?;
    tracing::debug!(url, path = %dest.display(), bytes = written, "fetched");
    Ok(written)
}

fn transfer(url: &str, tmp: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(tmp)?;
    let mut written: u64 = 0;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)
        .map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.timeout(opts.timeout)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!("download write failed: {}", e);
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_error {
        return Err(FetchError::Storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    file.sync_all()?;
    Ok(written)
}
