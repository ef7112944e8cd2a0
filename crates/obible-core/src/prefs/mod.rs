//! Persisted preferences: the reader selection and display options.

mod options;
mod selection;
mod store;

pub use options::{Options, ReadTextAlignment, SchemeOption, SplitScreen, ThemeOption, KEYS};
pub use selection::{
    Selection, SelectionStore, SelectionUpdate, Slot, DEFAULT_BOOK, DEFAULT_CHAPTER,
    DEFAULT_TRANSLATION,
};
pub use store::PrefStore;
