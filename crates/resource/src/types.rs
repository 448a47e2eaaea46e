//! Core identity types shared by every inventory

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-qualified resource type such as `aws_s3_bucket`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(String);

impl ResourceType {
    /// Create a resource type from its Terraform name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The Terraform type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider prefix (`aws` for `aws_s3_bucket`).
    pub fn provider(&self) -> &str {
        self.0.split_once('_').map_or(self.0.as_str(), |(provider, _)| provider)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ResourceType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for ResourceType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ResourceType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ResourceType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identity of an infrastructure object.
///
/// Two resources describe the same object iff their keys are equal,
/// whatever their attributes say.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceKey {
    #[serde(rename = "type")]
    pub ty: ResourceType,
    pub id: String,
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.ty, self.id)
    }
}

/// Provenance of a state-derived resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// State document, as `<key>://<path>`
    pub state: String,
    /// Module path (`module.iam_iam-user`), empty for the root module
    pub module: String,
    /// Logical resource name in the configuration
    pub name: String,
}

impl Source {
    pub fn new(
        state: impl Into<String>,
        module: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            module: module.into(),
            name: name.into(),
        }
    }

    /// Address of the resource inside its state (`module.x.name` or `name`).
    pub fn internal_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.internal_name(), self.state)
    }
}

bitflags! {
    /// Behavior flags attached to a resource schema.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// Full attributes are only available through a details fetch.
        const DEEP_MODE = 1;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_provider() {
        assert_eq!(ResourceType::new("aws_s3_bucket").provider(), "aws");
        assert_eq!(ResourceType::new("azurerm_resource_group").provider(), "azurerm");
        assert_eq!(ResourceType::new("standalone").provider(), "standalone");
    }

    #[test]
    fn test_resource_type_compares_with_str() {
        let ty = ResourceType::from("aws_route");
        assert_eq!(ty, "aws_route");
        assert_eq!(ty.to_string(), "aws_route");
    }

    #[test]
    fn test_source_internal_name() {
        let root = Source::new("tfstate://terraform.tfstate", "", "bucket");
        assert_eq!(root.internal_name(), "bucket");

        let nested = Source::new("tfstate://terraform.tfstate", "module.iam_iam-user", "user");
        assert_eq!(nested.internal_name(), "module.iam_iam-user.user");
    }

    #[test]
    fn test_flags() {
        let mut flags = Flags::empty();
        flags |= Flags::DEEP_MODE;
        assert!(flags.contains(Flags::DEEP_MODE));
        assert!(!Flags::empty().contains(Flags::DEEP_MODE));
        assert!(Flags::default().is_empty());
    }

    #[test]
    fn test_key_display() {
        let key = ResourceKey {
            ty: "aws_api_gateway_rest_api".into(),
            id: "3of73v5ob4".into(),
        };
        assert_eq!(key.to_string(), "aws_api_gateway_rest_api.3of73v5ob4");
    }
}
