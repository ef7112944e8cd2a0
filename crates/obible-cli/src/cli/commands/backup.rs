//! `obible backup` – write zip archives of the documents and preferences.

use anyhow::{Context, Result};
use obible_core::backup::{self, BackupKind};
use std::path::PathBuf;

use crate::cli::AppContext;

pub fn run_backup(
    ctx: &AppContext,
    documents: bool,
    preferences: bool,
    dest: Option<PathBuf>,
) -> Result<()> {
    let dest = match dest.or_else(|| ctx.cfg.backup_dir.clone()) {
        Some(d) => d,
        None => std::env::current_dir().context("current directory")?,
    };
    let both = !documents && !preferences;
    let mut kinds = Vec::new();
    if documents || both {
        kinds.push(BackupKind::Documents);
    }
    if preferences || both {
        kinds.push(BackupKind::Preferences);
    }
    for kind in kinds {
        let path = backup::backup(&ctx.layout, kind, &dest)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
