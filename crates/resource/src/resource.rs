//! The Resource entity

use crate::attributes::Attributes;
use crate::schema::ResourceSchema;
use crate::types::{ResourceKey, ResourceType, Source};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One infrastructure object, from either a state document or a cloud API.
///
/// Resources are built by a [`ResourceFactory`](crate::ResourceFactory) and
/// are immutable afterwards: normalization happens once, at construction.
#[derive(Clone, Serialize)]
pub struct Resource {
    id: String,
    #[serde(rename = "type")]
    ty: ResourceType,
    attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Source>,
    #[serde(skip)]
    schema: Option<Arc<ResourceSchema>>,
}

impl Resource {
    /// Build a resource without schema metadata.
    pub fn new(ty: impl Into<ResourceType>, id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            ty: ty.into(),
            attributes,
            source: None,
            schema: None,
        }
    }

    pub(crate) fn with_schema(mut self, schema: Arc<ResourceSchema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Attach provenance. Only state-derived resources carry one.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn resource_id(&self) -> &str {
        &self.id
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.ty
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn schema(&self) -> Option<&Arc<ResourceSchema>> {
        self.schema.as_ref()
    }

    /// Whether a schema was registered for this resource's type.
    pub fn is_supported(&self) -> bool {
        self.schema.is_some()
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey {
            ty: self.ty.clone(),
            id: self.id.clone(),
        }
    }

    /// Reporting-only projection, empty when the type defines none.
    pub fn human_readable_attributes(&self) -> BTreeMap<String, String> {
        self.schema
            .as_ref()
            .and_then(|schema| schema.human_readable)
            .map(|f| f(&self.attributes))
            .unwrap_or_default()
    }

    /// Natural-key attributes used to re-read the resource from its provider.
    pub fn read_attributes(&self) -> BTreeMap<String, String> {
        self.schema
            .as_ref()
            .and_then(|schema| schema.resolve_read)
            .map(|f| f(&self.attributes))
            .unwrap_or_default()
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.ty == other.ty
            && self.attributes == other.attributes
            && self.source == other.source
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("id", &self.id)
            .field("type", &self.ty)
            .field("attributes", &self.attributes)
            .field("source", &self.source)
            .field("supported", &self.is_supported())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route_table(attrs: &Attributes) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        if let Some(table) = attrs.get_str("route_table_id") {
            out.insert("Table".to_string(), table.to_string());
        }
        out
    }

    #[test]
    fn test_identity_ignores_attributes() {
        let mut attrs = Attributes::new();
        attrs.insert("acl", "private");
        let a = Resource::new("aws_s3_bucket", "bucket", attrs);
        let b = Resource::new("aws_s3_bucket", "bucket", Attributes::new());

        assert_eq!(a.key(), b.key());
        assert_ne!(a, b);
    }

    #[test]
    fn test_unsupported_resource_has_no_projections() {
        let res = Resource::new("aws_unknown", "x", Attributes::new());
        assert!(!res.is_supported());
        assert!(res.human_readable_attributes().is_empty());
        assert!(res.read_attributes().is_empty());
    }

    #[test]
    fn test_human_readable_from_schema() {
        let schema = ResourceSchema {
            human_readable: Some(route_table),
            ..ResourceSchema::default()
        };
        let mut attrs = Attributes::new();
        attrs.insert("route_table_id", "rtb-1");
        let res = Resource::new("aws_route", "r-1", attrs).with_schema(Arc::new(schema));

        assert_eq!(res.human_readable_attributes()["Table"], "rtb-1");
    }

    #[test]
    fn test_serialize_skips_missing_source() {
        let res = Resource::new("aws_s3_bucket", "bucket", Attributes::new());
        let value = serde_json::to_value(&res).unwrap();
        assert_eq!(value, json!({"id": "bucket", "type": "aws_s3_bucket", "attributes": {}}));

        let res = res.with_source(Source::new("tfstate://a.tfstate", "", "b"));
        let value = serde_json::to_value(&res).unwrap();
        assert_eq!(value["source"]["state"], "tfstate://a.tfstate");
    }
}
