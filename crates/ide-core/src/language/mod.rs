//! Language domain module.

mod model;

pub use model::{
    DEFAULT_LANGUAGE_ID, LANGUAGES, LanguageConfig, Runtime, default_language, find_language,
};
