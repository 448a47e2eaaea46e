//! State location parsing
//!
//! A location is `[<key>://]<path>`. Supported keys are `tfstate` (local
//! file, the default when no key is given) and `tfstate+http` /
//! `tfstate+https` (fetched over HTTP).

use crate::error::{Error, Result};
use std::fmt;

/// Default provenance key for state files.
pub const DEFAULT_KEY: &str = "tfstate";

/// How a state document is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    File,
    Http,
    Https,
}

/// Where a state document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLocation {
    key: String,
    path: String,
    kind: BackendKind,
}

impl StateLocation {
    /// Parse a location, using `default_key` as provenance key when the
    /// input has no scheme.
    pub fn parse(input: &str, default_key: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidLocation {
            location: input.to_string(),
            reason: reason.to_string(),
        };

        let (key, path, kind) = match input.split_once("://") {
            Some((scheme, path)) => {
                let kind = match scheme {
                    "tfstate" => BackendKind::File,
                    "tfstate+http" => BackendKind::Http,
                    "tfstate+https" => BackendKind::Https,
                    other => return Err(invalid(&format!("unsupported scheme {other}"))),
                };
                (scheme.to_string(), path, kind)
            }
            None => (default_key.to_string(), input, BackendKind::File),
        };

        if path.is_empty() {
            return Err(invalid("empty path"));
        }

        Ok(Self {
            key,
            path: path.to_string(),
            kind,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Provenance string attached to resources, `<key>://<path>`.
    pub fn source(&self) -> String {
        format!("{}://{}", self.key, self.path)
    }

    /// Last path segment, used in version error messages.
    pub fn file_name(&self) -> &str {
        let trimmed = self.path.split(['?', '#']).next().unwrap_or(&self.path);
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// URL to fetch for HTTP locations.
    pub fn url(&self) -> Option<String> {
        match self.kind {
            BackendKind::File => None,
            BackendKind::Http => Some(format!("http://{}", self.path)),
            BackendKind::Https => Some(format!("https://{}", self.path)),
        }
    }
}

impl fmt::Display for StateLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source())
    }
}
