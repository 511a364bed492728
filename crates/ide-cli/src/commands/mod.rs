pub mod auth;
pub mod editor;
pub mod output;
pub mod prefs;
pub mod snippets;
