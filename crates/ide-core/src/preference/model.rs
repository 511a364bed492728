//! Preference domain model.

use serde::{Deserialize, Serialize};

use crate::language::DEFAULT_LANGUAGE_ID;
use crate::theme::DEFAULT_THEME_ID;

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 24;
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// User-selected editor preferences.
///
/// Each field is persisted under its own key as soon as it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub language: String,
    pub theme: String,
    /// Always within [`MIN_FONT_SIZE`, `MAX_FONT_SIZE`]
    pub font_size: u32,
}

impl Default for Preference {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE_ID.to_string(),
            theme: DEFAULT_THEME_ID.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Clamps a requested font size into the supported range.
pub fn clamp_font_size(size: i64) -> u32 {
    size.clamp(MIN_FONT_SIZE as i64, MAX_FONT_SIZE as i64) as u32
}

/// Parses a persisted font size, falling back to the default when unreadable.
pub fn parse_font_size(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|size| *size != 0)
        .map(clamp_font_size)
        .unwrap_or(DEFAULT_FONT_SIZE)
}
