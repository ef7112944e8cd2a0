//! Display and behaviour options (`options.json`).

use anyhow::{bail, Context, Result};
use std::fmt;
use std::str::FromStr;

use super::store::PrefStore;
use crate::layout::Layout;

const STORE_NAME: &str = "options";

/// Declares a preference enum whose stored form is the variant name.
macro_rules! pref_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .with_context(|| {
                        let names: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!("expected one of {}", names.join(", "))
                    })
            }
        }
    };
}

pref_enum!(ThemeOption { System, Light, Dark, Amoled });
pref_enum!(SchemeOption { Dynamic, Static });
pref_enum!(ReadTextAlignment { Start, Justify });
pref_enum!(
    /// Whether a second reader with its own selection is shown.
    SplitScreen { Off, Vertical, Horizontal }
);

/// Option keys as stored on disk.
pub const KEYS: &[&str] = &[
    "theme",
    "scheme",
    "textAlignment",
    "showVerseNumbers",
    "checkAtStartup",
    "split",
    "notifyDownload",
    "infiniteScroll",
    "fontSizeStart",
    "fontSizeEnd",
    "verseOfTheDay",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub theme: ThemeOption,
    pub scheme: SchemeOption,
    pub text_alignment: ReadTextAlignment,
    pub show_verse_numbers: bool,
    /// Refresh the index and look for updates when reading.
    pub check_at_startup: bool,
    pub split: SplitScreen,
    pub notify_download: bool,
    pub infinite_scroll: bool,
    pub font_size_start: f64,
    pub font_size_end: f64,
    pub verse_of_the_day: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            theme: ThemeOption::System,
            scheme: SchemeOption::Dynamic,
            text_alignment: ReadTextAlignment::Start,
            show_verse_numbers: true,
            check_at_startup: true,
            split: SplitScreen::Off,
            notify_download: false,
            infinite_scroll: true,
            font_size_start: 1.0,
            font_size_end: 1.8,
            verse_of_the_day: false,
        }
    }
}

impl Options {
    pub fn load(layout: &Layout) -> Self {
        Self::from_store(&PrefStore::open(&layout.pref_path(STORE_NAME)))
    }

    fn from_store(store: &PrefStore) -> Self {
        let d = Options::default();
        let theme = store
            .get_string("theme", d.theme.as_str())
            .parse()
            .unwrap_or(ThemeOption::System);
        // A present but unrecognised scheme reads as Static.
        let scheme = store
            .get_string("scheme", d.scheme.as_str())
            .parse()
            .unwrap_or(SchemeOption::Static);
        let text_alignment = store
            .get_string("textAlignment", d.text_alignment.as_str())
            .parse()
            .unwrap_or(ReadTextAlignment::Start);
        let split = store
            .get_string("split", d.split.as_str())
            .parse()
            .unwrap_or(SplitScreen::Off);
        Self {
            theme,
            scheme,
            text_alignment,
            show_verse_numbers: store.get_bool("showVerseNumbers", d.show_verse_numbers),
            check_at_startup: store.get_bool("checkAtStartup", d.check_at_startup),
            split,
            notify_download: store.get_bool("notifyDownload", d.notify_download),
            infinite_scroll: store.get_bool("infiniteScroll", d.infinite_scroll),
            font_size_start: store.get_f64("fontSizeStart", d.font_size_start),
            font_size_end: store.get_f64("fontSizeEnd", d.font_size_end),
            verse_of_the_day: store.get_bool("verseOfTheDay", d.verse_of_the_day),
        }
    }

    pub fn save(&self, layout: &Layout) -> Result<()> {
        let mut store = PrefStore::open(&layout.pref_path(STORE_NAME));
        store.put_string("theme", self.theme.as_str());
        store.put_string("scheme", self.scheme.as_str());
        store.put_string("textAlignment", self.text_alignment.as_str());
        store.put_bool("showVerseNumbers", self.show_verse_numbers);
        store.put_bool("checkAtStartup", self.check_at_startup);
        store.put_string("split", self.split.as_str());
        store.put_bool("notifyDownload", self.notify_download);
        store.put_bool("infiniteScroll", self.infinite_scroll);
        store.put_f64("fontSizeStart", self.font_size_start);
        store.put_f64("fontSizeEnd", self.font_size_end);
        store.put_bool("verseOfTheDay", self.verse_of_the_day);
        store.commit()
    }

    /// Set one option from its stored key and a textual value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let with_key = || format!("invalid value {value:?} for {key}");
        match key {
            "theme" => self.theme = value.parse().with_context(with_key)?,
            "scheme" => self.scheme = value.parse().with_context(with_key)?,
            "textAlignment" => self.text_alignment = value.parse().with_context(with_key)?,
            "split" => self.split = value.parse().with_context(with_key)?,
            "showVerseNumbers" => self.show_verse_numbers = parse_bool(value).with_context(with_key)?,
            "checkAtStartup" => self.check_at_startup = parse_bool(value).with_context(with_key)?,
            "notifyDownload" => self.notify_download = parse_bool(value).with_context(with_key)?,
            "infiniteScroll" => self.infinite_scroll = parse_bool(value).with_context(with_key)?,
            "verseOfTheDay" => self.verse_of_the_day = parse_bool(value).with_context(with_key)?,
            "fontSizeStart" | "fontSizeEnd" => {
                let size: f64 = value.trim().parse().with_context(with_key)?;
                if !size.is_finite() || size <= 0.0 {
                    bail!("{}: font size must be positive", with_key());
                }
                let (start, end) = if key == "fontSizeStart" {
                    (size, self.font_size_end)
                } else {
                    (self.font_size_start, size)
                };
                if start > end {
                    bail!("fontSizeStart ({start}) must not exceed fontSizeEnd ({end})");
                }
                self.font_size_start = start;
                self.font_size_end = end;
            }
            _ => bail!("unknown option {key:?}; known options: {}", KEYS.join(", ")),
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("theme", self.theme.to_string()),
            ("scheme", self.scheme.to_string()),
            ("textAlignment", self.text_alignment.to_string()),
            ("showVerseNumbers", self.show_verse_numbers.to_string()),
            ("checkAtStartup", self.check_at_startup.to_string()),
            ("split", self.split.to_string()),
            ("notifyDownload", self.notify_download.to_string()),
            ("infiniteScroll", self.infinite_scroll.to_string()),
            ("fontSizeStart", self.font_size_start.to_string()),
            ("fontSizeEnd", self.font_size_end.to_string()),
            ("verseOfTheDay", self.verse_of_the_day.to_string()),
        ]
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => bail!("expected true/false, got {other:?}"),
    }
}
