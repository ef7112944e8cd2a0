//! CLI for the obible reader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use obible_core::cache::TranslationCache;
use obible_core::config::{self, ObibleConfig};
use obible_core::layout::Layout;
use std::path::PathBuf;

use commands::{
    run_backup, run_books, run_checksum, run_completions, run_index, run_install, run_list,
    run_manpage, run_read, run_remove, run_restore, run_search, run_select, run_settings,
    run_update, ReadArgs,
};

/// Top-level CLI for the obible reader.
#[derive(Debug, Parser)]
#[command(name = "obible")]
#[command(about = "Read Bible translations from a local cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the translation index if it is missing or older than a day.
    Index {
        /// Refetch even if the cached index is fresh.
        #[arg(long)]
        force: bool,
    },

    /// List translations from the cached index.
    List {
        /// Include translations carrying the apocrypha.
        #[arg(long)]
        all: bool,
    },

    /// Download one or more translations.
    Install {
        /// Translation abbreviations, e.g. `kjv schlachter`.
        #[arg(required = true)]
        abbrevs: Vec<String>,
    },

    /// Delete a cached translation.
    Remove {
        abbrev: String,
    },

    /// Re-download translations whose published checksum changed.
    Update {
        /// Only report outdated translations.
        #[arg(long)]
        check_only: bool,
    },

    /// List the books of the selected translation.
    Books {
        /// Use the split-screen selection.
        #[arg(long)]
        split: bool,
    },

    /// Print the selected chapter.
    Read {
        /// Use the split-screen selection.
        #[arg(long)]
        split: bool,
        /// Switch translation before reading.
        #[arg(long)]
        translation: Option<String>,
        /// Book number (1-based).
        #[arg(long)]
        book: Option<usize>,
        /// Chapter number (1-based).
        #[arg(long)]
        chapter: Option<usize>,
        /// Advance to the next chapter.
        #[arg(long, conflicts_with = "prev")]
        next: bool,
        /// Go back to the previous chapter.
        #[arg(long)]
        prev: bool,
    },

    /// Select translation, book and chapter.
    Select {
        translation: String,
        /// Book number (1-based).
        #[arg(long, default_value = "1")]
        book: usize,
        /// Chapter number (1-based).
        #[arg(long, default_value = "1")]
        chapter: usize,
        /// Store as the split-screen selection.
        #[arg(long)]
        split: bool,
    },

    /// Search the selected translation for text.
    Search {
        query: String,
        /// Select the N-th result (1-based) for reading.
        #[arg(long, value_name = "N")]
        open: Option<usize>,
    },

    /// Show all options, or set one (`obible settings theme Dark`).
    Settings {
        #[arg(requires = "value")]
        key: Option<String>,
        value: Option<String>,
    },

    /// Write zip backups of the documents and/or preferences.
    Backup {
        #[arg(long)]
        documents: bool,
        #[arg(long)]
        preferences: bool,
        /// Target directory (default: `backup_dir` from config, else the current directory).
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Restore a backup archive (documents unless --preferences).
    Restore {
        path: PathBuf,
        #[arg(long)]
        preferences: bool,
    },

    /// Compute SHA-256 of a cached translation.
    Checksum {
        abbrev: String,
    },

    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },

    /// Print the man page.
    Manpage,
}

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub cfg: ObibleConfig,
    pub layout: Layout,
    pub cache: TranslationCache,
}

impl AppContext {
    fn load() -> Result<Self> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let layout = Layout::from_config(&cfg)?;
        layout.ensure()?;
        let cache = TranslationCache::new(layout.clone(), &cfg)?;
        Ok(Self { cfg, layout, cache })
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Manpage => return run_manpage(),
            _ => {}
        }

        let ctx = AppContext::load()?;
        match cli.command {
            CliCommand::Index { force } => run_index(&ctx, force).await?,
            CliCommand::List { all } => run_list(&ctx, all)?,
            CliCommand::Install { abbrevs } => run_install(&ctx, &abbrevs).await?,
            CliCommand::Remove { abbrev } => run_remove(&ctx, &abbrev)?,
            CliCommand::Update { check_only } => run_update(&ctx, check_only).await?,
            CliCommand::Books { split } => run_books(&ctx, split)?,
            CliCommand::Read {
                split,
                translation,
                book,
                chapter,
                next,
                prev,
            } => {
                let args = ReadArgs {
                    split,
                    translation,
                    book,
                    chapter,
                    next,
                    prev,
                };
                run_read(&ctx, args).await?
            }
            CliCommand::Select {
                translation,
                book,
                chapter,
                split,
            } => run_select(&ctx, &translation, book, chapter, split)?,
            CliCommand::Search { query, open } => run_search(&ctx, &query, open)?,
            CliCommand::Settings { key, value } => run_settings(&ctx, key.as_deref(), value.as_deref())?,
            CliCommand::Backup {
                documents,
                preferences,
                dest,
            } => run_backup(&ctx, documents, preferences, dest)?,
            CliCommand::Restore { path, preferences } => run_restore(&ctx, &path, preferences)?,
            CliCommand::Checksum { abbrev } => run_checksum(&ctx, &abbrev)?,
            CliCommand::Completions { .. } | CliCommand::Manpage => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
