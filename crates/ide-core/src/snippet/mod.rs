//! Snippet domain module.

mod model;

pub use model::{NewSnippet, Snippet, SnippetFilter, decode_envelope, popular_languages};
