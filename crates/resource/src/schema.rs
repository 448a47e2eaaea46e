//! Schema registry: per-type attribute metadata and normalization hooks
//!
//! The registry is built once per provider, before any resource of that
//! provider is created, and then shared read-only behind an `Arc`.

use crate::attributes::Attributes;
use crate::error::{Error, Result};
use crate::types::{Flags, ResourceType};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Removes non-comparable attributes in place. Must only delete.
pub type NormalizeFn = fn(&mut Attributes);

/// Projects attributes into a flat string map.
pub type AttributesFn = fn(&Attributes) -> BTreeMap<String, String>;

/// Metadata for one attribute of a resource type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttributeSchema {
    /// Value the provider assumes when the attribute is not declared
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub optional: bool,
}

impl AttributeSchema {
    pub fn with_default(default: impl Into<Value>) -> Self {
        Self {
            default: Some(default.into()),
            optional: true,
            ..Self::default()
        }
    }
}

/// Everything known about one resource type.
#[derive(Debug, Clone, Default)]
pub struct ResourceSchema {
    pub version: u64,
    pub attributes: BTreeMap<String, AttributeSchema>,
    pub flags: Flags,
    pub normalize: Option<NormalizeFn>,
    pub human_readable: Option<AttributesFn>,
    pub resolve_read: Option<AttributesFn>,
}

impl ResourceSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: &str, attribute: AttributeSchema) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    pub fn is_deep_mode(&self) -> bool {
        self.flags.contains(Flags::DEEP_MODE)
    }

    /// Declared defaults, by attribute name.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes
            .iter()
            .filter_map(|(name, attr)| attr.default.as_ref().map(|d| (name.as_str(), d)))
    }
}

/// Resource schemas of one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSchema {
    resources: BTreeMap<ResourceType, ResourceSchema>,
}

#[derive(Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    provider_schemas: BTreeMap<String, ProviderSchemaJson>,
}

#[derive(Deserialize)]
struct ProviderSchemaJson {
    #[serde(default)]
    resource_schemas: BTreeMap<String, ResourceSchemaJson>,
}

#[derive(Deserialize)]
struct ResourceSchemaJson {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    block: BlockJson,
}

#[derive(Default, Deserialize)]
struct BlockJson {
    #[serde(default)]
    attributes: BTreeMap<String, AttributeSchema>,
}

impl ProviderSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, ty: impl Into<ResourceType>, schema: ResourceSchema) -> Self {
        self.resources.insert(ty.into(), schema);
        self
    }

    /// Parse the output of `terraform providers schema -json`, keeping the
    /// provider whose source address ends with `/<name>` (or equals it).
    ///
    /// Terraform does not export attribute defaults, so schemas loaded from
    /// its output elide nothing by default value. Only a hand-written
    /// document carrying a `default` key, or the built-in provider tables,
    /// feed [`ResourceSchema::defaults`].
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        let suffix = format!("/{name}");

        let provider = document
            .provider_schemas
            .into_iter()
            .find(|(address, _)| address == name || address.ends_with(&suffix))
            .map(|(_, provider)| provider)
            .ok_or_else(|| Error::ProviderNotInSchema {
                provider: name.to_string(),
            })?;

        let resources = provider
            .resource_schemas
            .into_iter()
            .map(|(ty, raw)| {
                let schema = ResourceSchema {
                    version: raw.version,
                    attributes: raw.block.attributes,
                    ..ResourceSchema::default()
                };
                (ResourceType::new(ty), schema)
            })
            .collect();

        Ok(Self { resources })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Process-scoped registry of resource schemas, keyed by provider.
#[derive(Debug, Default)]
pub struct SchemaRepository {
    providers: BTreeMap<String, String>,
    schemas: HashMap<ResourceType, Arc<ResourceSchema>>,
}

impl SchemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider's schemas. A provider can only be initialized once.
    pub fn init(&mut self, provider: &str, version: &str, schema: ProviderSchema) -> Result<()> {
        if let Some(existing) = self.providers.get(provider) {
            return Err(Error::ProviderAlreadyInitialized {
                provider: provider.to_string(),
                version: existing.clone(),
            });
        }

        log::debug!(
            "registering {} resource schemas for {provider}@{version}",
            schema.len()
        );
        self.providers.insert(provider.to_string(), version.to_string());
        for (ty, resource) in schema.resources {
            self.schemas.insert(ty, Arc::new(resource));
        }
        Ok(())
    }

    /// Version a provider was initialized with.
    pub fn provider_version(&self, provider: &str) -> Option<&str> {
        self.providers.get(provider).map(String::as_str)
    }

    pub fn get_schema(&self, ty: &str) -> Option<Arc<ResourceSchema>> {
        self.schemas.get(&ResourceType::new(ty)).cloned()
    }

    /// All registered types, sorted.
    pub fn supported_types(&self) -> Vec<&ResourceType> {
        let mut types: Vec<_> = self.schemas.keys().collect();
        types.sort();
        types
    }

    pub fn set_normalize_fn(&mut self, ty: &str, f: NormalizeFn) {
        if let Some(schema) = self.schema_mut(ty) {
            schema.normalize = Some(f);
        }
    }

    pub fn set_human_readable_fn(&mut self, ty: &str, f: AttributesFn) {
        if let Some(schema) = self.schema_mut(ty) {
            schema.human_readable = Some(f);
        }
    }

    pub fn set_resolve_read_fn(&mut self, ty: &str, f: AttributesFn) {
        if let Some(schema) = self.schema_mut(ty) {
            schema.resolve_read = Some(f);
        }
    }

    pub fn set_flags(&mut self, ty: &str, flags: Flags) {
        if let Some(schema) = self.schema_mut(ty) {
            schema.flags |= flags;
        }
    }

    fn schema_mut(&mut self, ty: &str) -> Option<&mut ResourceSchema> {
        match self.schemas.get_mut(&ResourceType::new(ty)) {
            Some(schema) => Some(Arc::make_mut(schema)),
            None => {
                log::warn!("unable to set metadata on {ty}: no schema registered");
                None
            }
        }
    }
}
