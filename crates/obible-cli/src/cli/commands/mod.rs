//! CLI command handlers. Each command is in its own file.

mod backup;
mod books;
mod checksum;
mod completions;
mod index;
mod install;
mod list;
mod read;
mod remove;
mod restore;
mod search;
mod select;
mod settings;
mod update;

pub use backup::run_backup;
pub use books::run_books;
pub use checksum::run_checksum;
pub use completions::{run_completions, run_manpage};
pub use index::run_index;
pub use install::run_install;
pub use list::run_list;
pub use read::{run_read, ReadArgs};
pub use remove::run_remove;
pub use restore::run_restore;
pub use search::run_search;
pub use select::run_select;
pub use settings::run_settings;
pub use update::run_update;

use anyhow::{bail, Result};
use obible_core::prefs::Slot;

/// Convert a 1-based user number to an index.
pub(crate) fn to_index(n: usize, what: &str) -> Result<usize> {
    match n.checked_sub(1) {
        Some(i) => Ok(i),
        None => bail!("{what} numbers start at 1"),
    }
}

pub(crate) fn slot(split: bool) -> Slot {
    if split {
        Slot::Split
    } else {
        Slot::Primary
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_index_is_one_based() {
        assert_eq!(to_index(1, "book").unwrap(), 0);
        assert_eq!(to_index(43, "book").unwrap(), 42);
        assert!(to_index(0, "chapter").is_err());
    }
}
