//! Error types for state reading

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a state document.
///
/// All of them are terminal for the read: nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The location string could not be understood
    #[error("invalid state location {location}: {reason}")]
    InvalidLocation {
        /// Location as given
        location: String,
        /// What is wrong with it
        reason: String,
    },

    /// The state file could not be read
    #[error("unable to read state file {}: {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// The remote state could not be fetched
    #[error("unable to fetch state from {url}: {message}")]
    Http {
        /// Requested URL
        url: String,
        /// HTTP status, if the server answered
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// The producing Terraform version is too old
    #[error(
        "{file} was generated using Terraform {version} which is currently not supported by driftscan. Please read documentation at https://docs.driftctl.com/limitations"
    )]
    UnsupportedVersion {
        /// File name of the state
        file: String,
        /// Declared producer version
        version: String,
    },

    /// The producing Terraform version is not a version string
    #[error(
        "Invalid Terraform version string: State file claims to have been written by Terraform version \"{version}\", which is not a valid version string."
    )]
    InvalidVersion {
        /// Declared producer version
        version: String,
    },

    /// The document uses a state format this reader does not parse
    #[error("{file} uses state format version {version}, only version 4 is supported")]
    UnsupportedFormatVersion {
        /// File name of the state
        file: String,
        /// Declared format version
        version: u64,
    },

    /// The document is not valid state JSON
    #[error("malformed state {file}: {source}")]
    Malformed {
        /// File name of the state
        file: String,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A resource instance could not be turned into a resource
    #[error("malformed resource {address} in {file}: {source}")]
    Instance {
        /// File name of the state
        file: String,
        /// Resource address (`module.x.type.name`)
        address: String,
        /// Deserialization error
        #[source]
        source: resource::Error,
    },
}

impl Error {
    pub(crate) fn http(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                url: url.to_string(),
                status: Some(code),
                message: format!("HTTP {code}"),
            },
            other => Self::Http {
                url: url.to_string(),
                status: None,
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for state operations.
pub type Result<T> = std::result::Result<T, Error>;
