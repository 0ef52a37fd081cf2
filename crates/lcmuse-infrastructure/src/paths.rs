//! Unified path management for lcmuse.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/lcmuse/                    # Config directory
//! └── config.toml                      # Optional settings file
//!
//! ~/.local/share/lcmuse/               # App directory (or $LCMUSE_HOME)
//! ├── supercollider_scripts/
//! │   └── generated/                   # Archived suggestions
//! │       └── suggestion_<timestamp>.scd
//! └── logs/
//!     └── lcmuse.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

/// Environment variable overriding the app directory.
pub const HOME_ENV: &str = "LCMUSE_HOME";

const APP_NAME: &str = "lcmuse";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for lcmuse.
pub struct LcmusePaths;

impl LcmusePaths {
    /// Returns the app directory, honouring `home_override` when it is set
    /// and non-empty.
    pub fn app_dir(home_override: Option<&str>) -> Result<PathBuf, PathError> {
        if let Some(home) = home_override.map(str::trim).filter(|h| !h.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the lcmuse configuration directory (e.g. `~/.config/lcmuse/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the optional settings file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_dir_override() {
        let dir = LcmusePaths::app_dir(Some("/srv/lcmuse")).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/lcmuse"));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        if let Ok(dir) = LcmusePaths::app_dir(Some("  ")) {
            assert!(dir.ends_with("lcmuse"));
        }
    }

    #[test]
    fn test_config_file() {
        if let Ok(config_file) = LcmusePaths::config_file() {
            assert!(config_file.ends_with("config.toml"));
            assert!(config_file.starts_with(LcmusePaths::config_dir().unwrap()));
        }
    }
}
