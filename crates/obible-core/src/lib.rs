pub mod config;
pub mod logging;

pub mod backup;
pub mod cache;
pub mod checksum;
pub mod fetch;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod prefs;
pub mod reader;
pub mod reconcile;
pub mod retry;
pub mod search;
