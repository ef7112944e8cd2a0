//! Zip backups of the documents cache and of the preference files.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::layout::Layout;

pub const DOCUMENTS_ARCHIVE: &str = "OpenBible-Documents.zip";
pub const PREFERENCES_ARCHIVE: &str = "OpenBible-Preferences.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupKind {
    Documents,
    Preferences,
}

impl BackupKind {
    pub fn archive_name(self) -> &'static str {
        match self {
            BackupKind::Documents => DOCUMENTS_ARCHIVE,
            BackupKind::Preferences => PREFERENCES_ARCHIVE,
        }
    }

    fn root(self, layout: &Layout) -> &Path {
        match self {
            BackupKind::Documents => layout.documents(),
            BackupKind::Preferences => layout.prefs(),
        }
    }
}

/// Archive the documents root (index, translations, checksums) into `dest_dir`.
pub fn backup_documents(layout: &Layout, dest_dir: &Path) -> Result<PathBuf> {
    backup(layout, BackupKind::Documents, dest_dir)
}

/// Archive the preference files into `dest_dir`.
pub fn backup_preferences(layout: &Layout, dest_dir: &Path) -> Result<PathBuf> {
    backup(layout, BackupKind::Preferences, dest_dir)
}

pub fn backup(layout: &Layout, kind: BackupKind, dest_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dest_dir).with_context(|| format!("create dir: {}", dest_dir.display()))?;
    let archive_path = dest_dir.join(kind.archive_name());
    let file = File::create(&archive_path)
        .with_context(|| format!("create {}", archive_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    // The destination may lie inside the root being archived.
    let archive_real = fs::canonicalize(&archive_path)
        .with_context(|| format!("resolve {}", archive_path.display()))?;
    let root = kind.root(layout);
    let mut entries = 0usize;
    if root.is_dir() {
        let walk = Walk {
            root,
            skip: &archive_real,
            options,
        };
        walk.add_dir(&mut zip, root, &mut entries)?;
    }
    zip.finish().context("finish archive")?;
    tracing::info!(path = %archive_path.display(), entries, "backup written");
    Ok(archive_path)
}

struct Walk<'a> {
    root: &'a Path,
    skip: &'a Path,
    options: FileOptions,
}

impl Walk<'_> {
    fn is_skipped(&self, path: &Path) -> bool {
        if path.to_string_lossy().ends_with(crate::fetch::TEMP_SUFFIX) {
            return true;
        }
        path.file_name() == self.skip.file_name()
            && fs::canonicalize(path).map(|p| p == self.skip).unwrap_or(false)
    }

    fn add_dir(&self, zip: &mut ZipWriter<File>, dir: &Path, entries: &mut usize) -> Result<()> {
        let mut children: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("read dir: {}", dir.display()))?
            .collect::<io::Result<_>>()?;
        children.sort_by_key(|e| e.file_name());

        for child in children {
            let path = child.path();
            let Ok(rel) = path.strip_prefix(self.root) else {
                continue;
            };
            // Zip entry names always use '/'.
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let file_type = child.file_type()?;
            if file_type.is_dir() {
                zip.add_directory(format!("{name}/"), self.options)?;
                self.add_dir(zip, &path, entries)?;
            } else if file_type.is_file() {
                if self.is_skipped(&path) {
                    continue;
                }
                zip.start_file(name, self.options)?;
                let mut src = File::open(&path).with_context(|| format!("open {}", path.display()))?;
                io::copy(&mut src, &mut *zip)?;
                *entries += 1;
            }
        }
        Ok(())
    }
}

/// Restore a documents archive over the documents root.
pub fn restore_documents(layout: &Layout, archive: &Path) -> Result<usize> {
    restore(layout, BackupKind::Documents, archive)
}

/// Restore a preferences archive over the prefs root.
pub fn restore_preferences(layout: &Layout, archive: &Path) -> Result<usize> {
    restore(layout, BackupKind::Preferences, archive)
}

/// The archive is copied into a temp file inside the target root first and
/// the copy is always removed afterwards. Entries whose names would leave the
/// root are skipped. Returns the number of files extracted.
pub fn restore(layout: &Layout, kind: BackupKind, archive: &Path) -> Result<usize> {
    let root = kind.root(layout);
    fs::create_dir_all(root).with_context(|| format!("create dir: {}", root.display()))?;

    let mut temp = tempfile::Builder::new()
        .prefix("restore")
        .suffix(".zip")
        .tempfile_in(root)
        .context("create temp archive")?;
    let mut src = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    io::copy(&mut src, temp.as_file_mut()).context("copy archive")?;

    let mut zip = ZipArchive::new(temp.reopen()?)
        .with_context(|| format!("{} is not a zip archive", archive.display()))?;

    // Validate everything before touching the target.
    let mut plan = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let entry = zip.by_index(i)?;
        match entry.enclosed_name().map(|p| p.to_path_buf()) {
            Some(rel) => plan.push((i, rel, entry.is_dir())),
            None => tracing::warn!(name = entry.name(), "skipping unsafe archive entry"),
        }
    }

    let mut extracted = 0usize;
    for (i, rel, is_dir) in plan {
        let out = root.join(&rel);
        if is_dir {
            fs::create_dir_all(&out).with_context(|| format!("create dir: {}", out.display()))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let mut entry = zip.by_index(i)?;
        let mut dst = File::create(&out).with_context(|| format!("create {}", out.display()))?;
        io::copy(&mut entry, &mut dst).with_context(|| format!("extract {}", rel.display()))?;
        extracted += 1;
    }
    // `temp` is removed on drop.
    tracing::info!(archive = %archive.display(), root = %root.display(), extracted, "backup restored");
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn populated() -> (tempfile::TempDir, Layout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::under(&dir.path().join("app"));
        layout.ensure().unwrap();
        fs::write(layout.translations_index_path(), r#"{"kjv": {}}"#).unwrap();
        fs::write(layout.translation_path("kjv"), r#"{"books": []}"#).unwrap();
        fs::write(layout.checksum_path("kjv"), "abc").unwrap();
        fs::write(layout.pref_path("selection"), r#"{"book": 3}"#).unwrap();
        (dir, layout)
    }

    #[test]
    fn documents_roundtrip_into_fresh_layout() {
        let (dir, layout) = populated();
        let out = dir.path().join("Download");
        let archive = backup_documents(&layout, &out).unwrap();
        assert_eq!(archive, out.join(DOCUMENTS_ARCHIVE));

        let fresh = Layout::under(&dir.path().join("other"));
        let n = restore_documents(&fresh, &archive).unwrap();
        assert_eq!(n, 3);
        assert_eq!(fs::read_to_string(fresh.checksum_path("kjv")).unwrap(), "abc");
        assert!(fresh.is_installed("kjv"));
        // Only the extracted tree remains; the temp copy is gone.
        let leftovers: Vec<_> = fs::read_dir(fresh.documents())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".zip"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn preferences_roundtrip() {
        let (dir, layout) = populated();
        let archive = backup_preferences(&layout, dir.path()).unwrap();
        fs::write(layout.pref_path("selection"), r#"{"book": 9}"#).unwrap();

        assert_eq!(restore_preferences(&layout, &archive).unwrap(), 1);
        assert_eq!(
            fs::read_to_string(layout.pref_path("selection")).unwrap(),
            r#"{"book": 3}"#
        );
    }

    #[test]
    fn corrupt_archive_is_rejected_and_documents_untouched() {
        let (dir, layout) = populated();
        let bogus = dir.path().join("bogus.zip");
        fs::write(&bogus, "definitely not a zip").unwrap();
        assert!(restore_documents(&layout, &bogus).is_err());
        assert_eq!(fs::read_to_string(layout.checksum_path("kjv")).unwrap(), "abc");
    }

    #[test]
    fn unsafe_entries_are_skipped() {
        let (dir, layout) = populated();
        let archive = dir.path().join("evil.zip");
        {
            let mut zip = ZipWriter::new(File::create(&archive).unwrap());
            let options = FileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file("../escape.txt", options).unwrap();
            zip.write_all(b"nope").unwrap();
            zip.start_file("Checksums/web", options).unwrap();
            zip.write_all(b"def").unwrap();
            zip.finish().unwrap();
        }
        assert_eq!(restore_documents(&layout, &archive).unwrap(), 1);
        assert!(!dir.path().join("app").join("escape.txt").exists());
        assert_eq!(fs::read_to_string(layout.checksum_path("web")).unwrap(), "def");
    }

    #[test]
    fn archive_written_inside_root_is_not_added_to_itself() {
        let (_dir, layout) = populated();
        let archive = backup_documents(&layout, layout.documents()).unwrap();
        assert_eq!(archive, layout.documents().join(DOCUMENTS_ARCHIVE));

        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(!names.iter().any(|n| n.ends_with(DOCUMENTS_ARCHIVE)), "{names:?}");
        assert!(names.contains(&"Checksums/kjv".to_string()));
    }
}
