//! Terraform version checks

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+(?:\.\d+)*)(?:-([0-9A-Za-z.\-~]+))?(?:\+([0-9A-Za-z.\-~]+))?$")
        .expect("version pattern is valid")
});

/// Oldest Terraform release whose state documents are read.
pub const MINIMUM_SUPPORTED: [u64; 3] = [0, 11, 0];

/// A parsed Terraform release version.
#[derive(Debug, Clone)]
pub struct TerraformVersion {
    segments: [u64; 3],
    prerelease: Option<String>,
    original: String,
}

impl TerraformVersion {
    /// Parse `major[.minor[.patch]][-pre][+meta]`, returning `None` when
    /// the string is not a version.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(input.trim())?;
        let mut segments = [0u64; 3];
        for (slot, part) in caps.get(1)?.as_str().split('.').take(3).enumerate() {
            segments[slot] = part.parse().ok()?;
        }
        Some(Self {
            segments,
            prerelease: caps.get(2).map(|m| m.as_str().to_string()),
            original: input.to_string(),
        })
    }

    pub fn segments(&self) -> [u64; 3] {
        self.segments
    }

    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    /// Whether state written by this release can be read.
    pub fn is_supported(&self) -> bool {
        self.segments >= MINIMUM_SUPPORTED
    }
}

impl PartialEq for TerraformVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TerraformVersion {}

impl PartialOrd for TerraformVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TerraformVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // A prerelease sorts before its release
        self.segments.cmp(&other.segments).then_with(|| {
            match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            }
        })
    }
}

impl fmt::Display for TerraformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let v = TerraformVersion::parse("0.15.4").unwrap();
        assert_eq!(v.segments(), [0, 15, 4]);
        assert_eq!(v.prerelease(), None);

        let v = TerraformVersion::parse("v1.0.0-beta2+local").unwrap();
        assert_eq!(v.segments(), [1, 0, 0]);
        assert_eq!(v.prerelease(), Some("beta2"));

        assert_eq!(TerraformVersion::parse("1").unwrap().segments(), [1, 0, 0]);
    }

    #[test]
    fn test_invalid() {
        assert!(TerraformVersion::parse("invalid").is_none());
        assert!(TerraformVersion::parse("").is_none());
        assert!(TerraformVersion::parse("1..2").is_none());
        assert!(TerraformVersion::parse("1.2.x").is_none());
    }

    #[test]
    fn test_supported() {
        assert!(!TerraformVersion::parse("0.10.26").unwrap().is_supported());
        assert!(TerraformVersion::parse("0.11.0").unwrap().is_supported());
        assert!(TerraformVersion::parse("0.12.29").unwrap().is_supported());
        assert!(TerraformVersion::parse("1.3.7").unwrap().is_supported());
    }

    #[test]
    fn test_ordering() {
        let pre = TerraformVersion::parse("1.0.0-rc1").unwrap();
        let release = TerraformVersion::parse("1.0.0").unwrap();
        let older = TerraformVersion::parse("0.15.5").unwrap();
        assert!(pre < release);
        assert!(older < pre);
    }
}
