//! Path resolution for aptsync
//!
//! # Environment Variables
//!
//! - `APTSYNC_CONFIG_DIR` - Override config directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `APTSYNC_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/aptsync` (if set)
//! 3. `~/.config/aptsync`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "APTSYNC_CONFIG_DIR";

/// Get the aptsync config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("aptsync");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("aptsync");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_dir_env_override() {
        let original = env::var(ENV_CONFIG_DIR).ok();
        // SAFETY: no other test reads or writes APTSYNC_CONFIG_DIR
        unsafe { env::set_var(ENV_CONFIG_DIR, "/custom/aptsync") };
        let result = config_dir().unwrap();
        match original {
            // SAFETY: as above
            Some(v) => unsafe { env::set_var(ENV_CONFIG_DIR, v) },
            None => unsafe { env::remove_var(ENV_CONFIG_DIR) },
        }
        assert_eq!(result, PathBuf::from("/custom/aptsync"));
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/aptly.conf");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("aptly.conf"));
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/etc/aptly.conf"), PathBuf::from("/etc/aptly.conf"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$APTSYNC_NONEXISTENT_VAR_12345/file");
        assert_eq!(
            result,
            PathBuf::from("/path/$APTSYNC_NONEXISTENT_VAR_12345/file")
        );
    }
}
