//! State document model (format version 4)

use crate::error::{Error, Result};
use crate::version::TerraformVersion;
use serde::Deserialize;
use serde_json::{Map, Value};

/// The only state format parsed.
pub const SUPPORTED_FORMAT_VERSION: u64 = 4;

#[derive(Debug, Deserialize)]
struct Header {
    version: u64,
    #[serde(default)]
    terraform_version: Option<String>,
}

/// A state document.
#[derive(Debug, Deserialize)]
pub struct State {
    pub version: u64,
    #[serde(default)]
    pub terraform_version: String,
    #[serde(default)]
    pub serial: u64,
    #[serde(default)]
    pub lineage: String,
    #[serde(default)]
    pub resources: Vec<StateResource>,
}

/// Whether an entry is managed by the configuration or read from a data source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Managed,
    Data,
}

/// One resource block, expanded into instances by `count`/`for_each`.
#[derive(Debug, Deserialize)]
pub struct StateResource {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl StateResource {
    /// `module.x.type.name`, or `type.name` in the root module.
    pub fn address(&self) -> String {
        match &self.module {
            Some(module) if !module.is_empty() => format!("{module}.{}.{}", self.ty, self.name),
            _ => format!("{}.{}", self.ty, self.name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub index_key: Option<Value>,
    #[serde(default)]
    pub schema_version: u64,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Instance {
    /// Instance suffix for addresses, `[0]` or `["key"]`.
    pub fn index_suffix(&self) -> String {
        match &self.index_key {
            Some(Value::Number(n)) => format!("[{n}]"),
            Some(Value::String(s)) => format!("[\"{s}\"]"),
            _ => String::new(),
        }
    }
}

/// Parse a state document after validating its declared versions.
///
/// The producer version is checked before the format version so a state
/// written by an unsupported release is reported as such.
pub fn parse(file: &str, bytes: &[u8]) -> Result<State> {
    let malformed = |source| Error::Malformed {
        file: file.to_string(),
        source,
    };

    let header: Header = serde_json::from_slice(bytes).map_err(malformed)?;

    if let Some(raw) = &header.terraform_version {
        let version = TerraformVersion::parse(raw).ok_or_else(|| Error::InvalidVersion {
            version: raw.clone(),
        })?;
        if !version.is_supported() {
            return Err(Error::UnsupportedVersion {
                file: file.to_string(),
                version: raw.clone(),
            });
        }
    }

    if header.version != SUPPORTED_FORMAT_VERSION {
        return Err(Error::UnsupportedFormatVersion {
            file: file.to_string(),
            version: header.version,
        });
    }

    serde_json::from_slice(bytes).map_err(malformed)
}
