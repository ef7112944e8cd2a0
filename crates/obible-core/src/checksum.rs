//! Local SHA-256 digests of cached documents.
//!
//! Update detection compares stored markers against the published index (see
//! `reconcile`); this digest is for inspecting what is actually on disk.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::layout::{validate_abbrev, Layout};

const BUF_SIZE: usize = 64 * 1024;

/// SHA-256 of a file as lowercase hex, read in chunks.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest of a cached translation, `None` if it is not installed.
pub fn translation_digest(layout: &Layout, abbrev: &str) -> Result<Option<String>> {
    validate_abbrev(abbrev)?;
    let path = layout.translation_path(abbrev);
    if !path.is_file() {
        return Ok(None);
    }
    sha256_path(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_path_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let digest = sha256_path(f.path()).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn translation_digest_of_cached_file() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::under(dir.path());
        layout.ensure().unwrap();
        assert!(translation_digest(&layout, "kjv").unwrap().is_none());

        std::fs::write(layout.translation_path("kjv"), b"hello\n").unwrap();
        assert_eq!(
            translation_digest(&layout, "kjv").unwrap().as_deref(),
            Some("5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03")
        );
        assert!(translation_digest(&layout, "../kjv").is_err());
    }
}
