//! `obible list` – show translations from the cached index.

use anyhow::Result;

use crate::cli::AppContext;

pub fn run_list(ctx: &AppContext, all: bool) -> Result<()> {
    let hide_apocrypha = ctx.cfg.hide_apocrypha && !all;
    let Some(translations) = ctx.cache.translations(hide_apocrypha) else {
        println!("No index cached. Run `obible index` first.");
        return Ok(());
    };
    let installed = ctx.cache.installed();

    println!("{:<20} {:<6} {:<10} {}", "ABBREV", "LANG", "STATE", "TRANSLATION");
    for (abbrev, t) in &translations {
        let state = if !installed.contains(abbrev) {
            "-"
        } else if ctx.cache.check_update(abbrev) {
            "outdated"
        } else {
            "installed"
        };
        println!("{:<20} {:<6} {:<10} {}", abbrev, t.lang, state, t.translation);
    }
    Ok(())
}
