//! driftscan configuration (`config.toml`)
//!
//! ```toml
//! [scan]
//! deep = false
//! jobs = 4
//! timeout_secs = 600
//!
//! [cache]
//! capacity = 0
//!
//! [state]
//! key = "tfstate"
//!
//! [filter]
//! ignore_types = ["aws_iam_*"]
//! driftignore = "~/infra/.driftignore"
//! ```

use crate::cli::ScanArgs;
use crate::paths;
use anyhow::{Context, Result, bail};
use remote::ScannerOptions;
use resource::DriftIgnore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default ignore file, looked up in the working directory
pub const DEFAULT_DRIFTIGNORE: &str = ".driftignore";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scan: ScanConfig,
    pub cache: CacheConfig,
    pub state: StateConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Hydrate scanned resources through details fetchers
    pub deep: bool,
    /// Resource types scanned concurrently
    pub jobs: usize,
    /// Whole-scan limit, 0 for none
    pub timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            deep: false,
            jobs: 4,
            timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum cached listings, 0 for unbounded
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateConfig {
    /// Provenance key for locations given without a scheme
    pub key: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            key: tfstate::DEFAULT_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Type globs left out of both inventories
    pub ignore_types: Vec<String>,
    /// Ignore file, `.driftignore` in the working directory when unset
    pub driftignore: Option<String>,
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config format in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.jobs == 0 {
            bail!("scan.jobs must be at least 1");
        }
        if self.state.key.is_empty() {
            bail!("state.key must not be empty");
        }
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn apply_scan_args(&mut self, args: &ScanArgs) -> Result<()> {
        if args.deep {
            self.scan.deep = true;
        }
        if let Some(jobs) = args.jobs {
            self.scan.jobs = jobs;
        }
        if let Some(timeout) = args.timeout {
            self.scan.timeout_secs = timeout;
        }
        self.validate()
    }

    pub fn scanner_options(&self) -> ScannerOptions {
        ScannerOptions {
            deep: self.scan.deep,
            jobs: self.scan.jobs,
            timeout: (self.scan.timeout_secs > 0).then(|| Duration::from_secs(self.scan.timeout_secs)),
        }
    }

    fn driftignore_path(&self) -> PathBuf {
        self.filter
            .driftignore
            .as_deref()
            .map_or_else(|| PathBuf::from(DEFAULT_DRIFTIGNORE), paths::expand)
    }

    /// Build the ignore filter shared by the state reader and the scanner.
    pub fn build_filter(&self) -> Result<DriftIgnore> {
        let path = self.driftignore_path();
        if self.filter.driftignore.is_some() && !path.exists() {
            bail!("Ignore file {} does not exist", path.display());
        }
        let filter = DriftIgnore::from_file(&path)
            .with_context(|| format!("Invalid ignore file {}", path.display()))?
            .with_type_patterns(&self.filter.ignore_types)
            .context("Invalid filter.ignore_types pattern")?;
        log::debug!("Loaded {} ignore rules", filter.len());
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource::{Filter, ResourceType};
    use tempfile::TempDir;

    fn scan_args(jobs: Option<usize>, timeout: Option<u64>, deep: bool) -> ScanArgs {
        ScanArgs {
            from: "terraform.tfstate".to_string(),
            replay: PathBuf::from("aws.json"),
            deep,
            jobs,
            timeout,
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.scan.deep);
        assert_eq!(config.scan.jobs, 4);
        assert_eq!(config.scan.timeout_secs, 600);
        assert_eq!(config.cache.capacity, 0);
        assert_eq!(config.state.key, "tfstate");

        let options = config.scanner_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[scan]\njobs = 16\n\n[cache]\ncapacity = 128\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.scan.jobs, 16);
        assert_eq!(config.scan.timeout_secs, 600);
        assert_eq!(config.cache.capacity, 128);
    }

    #[test]
    fn test_rejects_zero_jobs_and_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        fs::write(&path, "[scan]\njobs = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        fs::write(&path, "[scan]\nworkers = 2\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        config.apply_scan_args(&scan_args(Some(2), Some(0), true)).unwrap();
        assert!(config.scan.deep);

        let options = config.scanner_options();
        assert_eq!(options.jobs, 2);
        assert_eq!(options.timeout, None);

        assert!(config.apply_scan_args(&scan_args(Some(0), None, false)).is_err());
    }

    #[test]
    fn test_filter_composes_file_and_types() {
        let temp = TempDir::new().unwrap();
        let ignore = temp.path().join("ignore");
        fs::write(&ignore, "aws_s3_bucket\n").unwrap();

        let config = Config {
            filter: FilterConfig {
                ignore_types: vec!["aws_iam_*".to_string()],
                driftignore: Some(ignore.to_string_lossy().into_owned()),
            },
            ..Config::default()
        };
        let filter = config.build_filter().unwrap();
        assert!(filter.is_type_ignored(&ResourceType::new("aws_s3_bucket")));
        assert!(filter.is_type_ignored(&ResourceType::new("aws_iam_user")));
        assert!(!filter.is_type_ignored(&ResourceType::new("aws_route")));
    }

    #[test]
    fn test_configured_ignore_file_must_exist() {
        let config = Config {
            filter: FilterConfig {
                ignore_types: Vec::new(),
                driftignore: Some("/nonexistent/driftscan/.driftignore".to_string()),
            },
            ..Config::default()
        };
        assert!(config.build_filter().is_err());
    }
}
