//! Path resolution for driftscan
//!
//! # Environment Variables
//!
//! - `DRIFTSCAN_CONFIG_DIR` - Override config directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `DRIFTSCAN_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/driftscan` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\driftscan`
//!    - macOS/Linux: `~/.config/driftscan`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "DRIFTSCAN_CONFIG_DIR";

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the driftscan config directory path
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
        let path = PathBuf::from(xdg_config).join("driftscan");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("driftscan");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("driftscan");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Path of the config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Expand `~` and environment variables in a path
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Run `f` with `vars` set (`Some`) or removed (`None`), restoring them after.
    ///
    /// All environment manipulation happens in one test so the process
    /// environment is never changed concurrently.
    fn with_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let originals: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();
        for (key, value) in vars {
            // SAFETY: only this test mutates the environment
            match value {
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }
        let result = f();
        for (key, original) in originals {
            // SAFETY: only this test mutates the environment
            match original {
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }
        result
    }

    #[test]
    fn test_config_dir_resolution() {
        with_env(&[(ENV_CONFIG_DIR, Some("/custom/config/path"))], || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/config/path"));
            assert_eq!(
                config_file().unwrap(),
                PathBuf::from("/custom/config/path/config.toml")
            );
        });

        with_env(&[(ENV_CONFIG_DIR, Some("~/dotfiles/driftscan"))], || {
            let home = dirs::home_dir().unwrap();
            assert_eq!(config_dir().unwrap(), home.join("dotfiles").join("driftscan"));
        });

        with_env(
            &[
                (ENV_CONFIG_DIR, None),
                ("XDG_CONFIG_HOME", Some("/tmp/xdg-config-test")),
            ],
            || {
                assert_eq!(
                    config_dir().unwrap(),
                    PathBuf::from("/tmp/xdg-config-test/driftscan")
                );
            },
        );
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/state/terraform.tfstate");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("state").join("terraform.tfstate"));
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_VAR_12345/file"));
    }
}
