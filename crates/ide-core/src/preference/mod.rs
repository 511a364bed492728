//! Preference domain module.

mod model;

pub use model::{
    DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE, Preference, clamp_font_size, parse_font_size,
};
