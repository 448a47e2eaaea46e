//! `.driftignore` style filtering
//!
//! One rule per line:
//!
//! ```text
//! # comment
//! aws_iam_*                  # every type matching the glob
//! aws_s3_bucket.logs-*       # matching ids of one type
//! !aws_iam_user              # negation, later rules win
//! ```

use crate::context::Filter;
use crate::error::{Error, Result};
use crate::resource::Resource;
use crate::types::ResourceType;
use regex::Regex;
use std::path::Path;

#[derive(Debug)]
struct Rule {
    negated: bool,
    ty: Regex,
    /// `None` means the whole type
    id: Option<Regex>,
}

impl Rule {
    fn is_type_level(&self) -> bool {
        self.id.is_none()
    }

    fn matches(&self, ty: &str, id: &str) -> bool {
        self.ty.is_match(ty) && self.id.as_ref().is_none_or(|re| re.is_match(id))
    }
}

/// Ignore rules read from a `.driftignore` file or configuration.
#[derive(Debug, Default)]
pub struct DriftIgnore {
    rules: Vec<Rule>,
}

impl DriftIgnore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse rules from file content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut ignore = Self::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.split_once(" #").map_or(line, |(rule, _)| rule).trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            ignore.add_rule(line).map_err(|message| Error::IgnoreRule {
                line: index + 1,
                message,
            })?;
        }
        Ok(ignore)
    }

    /// Read rules from a file. A missing file yields no rules.
    pub fn from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("loading ignore rules from {}", path.display());
                Self::parse(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Append whole-type glob rules.
    pub fn with_type_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for (index, pattern) in patterns.iter().enumerate() {
            let pattern = pattern.as_ref().trim();
            if pattern.contains('.') {
                return Err(Error::IgnoreRule {
                    line: index + 1,
                    message: format!("type pattern {pattern} must not contain an id"),
                });
            }
            self.add_rule(pattern)
                .map_err(|message| Error::IgnoreRule {
                    line: index + 1,
                    message,
                })?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn add_rule(&mut self, line: &str) -> std::result::Result<(), String> {
        let (negated, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let (ty, id) = match body.split_once('.') {
            Some((ty, id)) => (ty, Some(id)),
            None => (body, None),
        };
        if ty.is_empty() {
            return Err("missing resource type".to_string());
        }

        let id = match id {
            None | Some("*") => None,
            Some("") => return Err("empty resource id".to_string()),
            Some(id) => Some(glob(id)?),
        };

        self.rules.push(Rule {
            negated,
            ty: glob(ty)?,
            id,
        });
        Ok(())
    }
}

fn glob(pattern: &str) -> std::result::Result<Regex, String> {
    let escaped: Vec<String> = pattern.split('*').map(regex::escape).collect();
    Regex::new(&format!("^{}$", escaped.join(".*"))).map_err(|e| e.to_string())
}

impl Filter for DriftIgnore {
    /// A type is skipped wholesale only when its last type-level rule
    /// ignores it and no later negated id rule can bring an instance back.
    fn is_type_ignored(&self, ty: &ResourceType) -> bool {
        let ty = ty.as_str();
        let Some(position) = self
            .rules
            .iter()
            .rposition(|rule| rule.is_type_level() && rule.ty.is_match(ty))
        else {
            return false;
        };
        !self.rules[position].negated
            && !self.rules[position + 1..]
                .iter()
                .any(|rule| rule.negated && rule.ty.is_match(ty))
    }

    fn is_resource_ignored(&self, resource: &Resource) -> bool {
        let ty = resource.resource_type().as_str();
        let id = resource.resource_id();
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(ty, id))
            .is_some_and(|rule| !rule.negated)
    }
}
