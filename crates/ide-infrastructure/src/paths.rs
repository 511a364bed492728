//! Where the client keeps its files.
//!
//! ```text
//! <config dir>/saas-ide/config.toml    client configuration
//! <data dir>/saas-ide/storage.json     persisted key/value state
//! ```
//!
//! `<config dir>` and `<data dir>` are the platform locations reported by
//! `dirs` (`~/.config` and `~/.local/share` on Linux).

use ide_core::{IdeError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "saas-ide";
const CONFIG_FILE: &str = "config.toml";
const STORAGE_FILE: &str = "storage.json";

fn app_dir(base: Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    base.map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| IdeError::config(format!("Cannot determine the {kind} directory")))
}

pub fn config_file() -> Result<PathBuf> {
    Ok(app_dir(dirs::config_dir(), "config")?.join(CONFIG_FILE))
}

pub fn storage_file() -> Result<PathBuf> {
    Ok(app_dir(dirs::data_dir(), "data")?.join(STORAGE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_dir() {
        let dir = app_dir(Some(PathBuf::from("/tmp/base")), "data").unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/base/saas-ide"));

        let err = app_dir(None, "config").unwrap_err();
        assert!(matches!(err, IdeError::Config(_)));
    }
}
