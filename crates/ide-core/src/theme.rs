//! Editor theme catalog.

use serde::Serialize;

/// Theme selected when nothing has been persisted yet.
pub const DEFAULT_THEME_ID: &str = "vs-dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub label: &'static str,
    /// Editor background colour
    pub color: &'static str,
}

pub const THEMES: &[Theme] = &[
    Theme {
        id: "vs-dark",
        label: "Dark Mode",
        color: "#1e1e2e",
    },
    Theme {
        id: "vs-light",
        label: "Light Mode",
        color: "#ffffff",
    },
    Theme {
        id: "github-dark",
        label: "GitHub Dark",
        color: "#0d1117",
    },
    Theme {
        id: "monokai",
        label: "Monokai",
        color: "#272822",
    },
    Theme {
        id: "solarized-dark",
        label: "Solarized Dark",
        color: "#002b36",
    },
];

pub fn find_theme(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.id == id)
}

/// Resolves `id` to a known theme, falling back to the default theme.
pub fn resolve_theme(id: &str) -> &'static Theme {
    find_theme(id).unwrap_or(&THEMES[0])
}
