//! Resource construction and normalization

use crate::attributes::Attributes;
use crate::resource::Resource;
use crate::schema::{ResourceSchema, SchemaRepository};
use crate::types::ResourceType;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Builds resources from raw attribute maps.
///
/// State-derived and API-derived resources go through the same factory so
/// they end up normalized identically.
pub trait ResourceFactory: Send + Sync {
    fn create_abstract_resource(&self, ty: &str, id: &str, attributes: Attributes) -> Resource;
}

/// Normalize attributes against a schema.
///
/// Runs, in order: null/empty sanitizing, declared-default elision, the
/// type's normalize function, then sanitizing again so deletions inside
/// nested blocks do not leave empty shells behind. Idempotent.
pub fn normalize(schema: &ResourceSchema, attributes: &mut Attributes) {
    attributes.sanitize_defaults();

    for (name, default) in schema.defaults() {
        if attributes.get(name) == Some(default) {
            attributes.safe_delete(&[name]);
        }
    }

    if let Some(normalize_fn) = schema.normalize {
        normalize_fn(attributes);
        attributes.sanitize_defaults();
    }
}

/// [`ResourceFactory`] backed by a [`SchemaRepository`].
///
/// Types without a registered schema still produce a resource, unnormalized,
/// and are remembered in [`unsupported_types`](Self::unsupported_types).
#[derive(Debug)]
pub struct SchemaResourceFactory {
    schemas: Arc<SchemaRepository>,
    unsupported: Mutex<BTreeSet<ResourceType>>,
}

impl SchemaResourceFactory {
    pub fn new(schemas: Arc<SchemaRepository>) -> Self {
        Self {
            schemas,
            unsupported: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn schemas(&self) -> &Arc<SchemaRepository> {
        &self.schemas
    }

    /// Types seen so far that have no schema.
    pub fn unsupported_types(&self) -> Vec<ResourceType> {
        self.unsupported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn record_unsupported(&self, ty: &str) {
        let mut unsupported = self.unsupported.lock().unwrap_or_else(PoisonError::into_inner);
        if unsupported.insert(ResourceType::new(ty)) {
            log::warn!("no schema for {ty}, its resources will not be normalized");
        }
    }
}

impl ResourceFactory for SchemaResourceFactory {
    fn create_abstract_resource(&self, ty: &str, id: &str, mut attributes: Attributes) -> Resource {
        match self.schemas.get_schema(ty) {
            Some(schema) => {
                normalize(&schema, &mut attributes);
                Resource::new(ty, id, attributes).with_schema(schema)
            }
            None => {
                self.record_unsupported(ty);
                Resource::new(ty, id, attributes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeSchema, ProviderSchema};
    use serde_json::{Value, json};

    fn attrs(value: Value) -> Attributes {
        serde_json::from_value(value).unwrap()
    }

    fn strip_timeouts(attrs: &mut Attributes) {
        attrs.safe_delete(&["timeouts", "create"]);
        attrs.delete_if_default("nat_gateway_id");
    }

    fn factory() -> SchemaResourceFactory {
        let schema = ResourceSchema {
            normalize: Some(strip_timeouts),
            ..ResourceSchema::default()
        }
        .with_attribute("force_destroy", AttributeSchema::with_default(false))
        .with_attribute("acl", AttributeSchema::with_default("private"));

        let mut repo = SchemaRepository::new();
        repo.init(
            "aws",
            "3.19.0",
            ProviderSchema::new().with_resource("aws_route", schema),
        )
        .unwrap();
        SchemaResourceFactory::new(Arc::new(repo))
    }

    #[test]
    fn test_known_type_is_normalized() {
        let factory = factory();
        let res = factory.create_abstract_resource(
            "aws_route",
            "r-1",
            attrs(json!({
                "route_table_id": "rtb-1",
                "nat_gateway_id": "",
                "acl": "private",
                "force_destroy": true,
                "timeouts": {"create": "5m"},
                "tags": null
            })),
        );

        assert!(res.is_supported());
        assert_eq!(
            res.attributes(),
            &attrs(json!({"route_table_id": "rtb-1", "force_destroy": true}))
        );
        assert!(factory.unsupported_types().is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let factory = factory();
        let raw = attrs(json!({
            "route_table_id": "rtb-1",
            "acl": "public-read",
            "force_destroy": false,
            "timeouts": {"create": "5m", "delete": "10m"},
            "nested": {"inner": {}}
        }));

        let once = factory.create_abstract_resource("aws_route", "r-1", raw);
        let twice =
            factory.create_abstract_resource("aws_route", "r-1", once.attributes().clone());

        assert_eq!(once, twice);
        assert_eq!(
            once.attributes(),
            &attrs(json!({
                "route_table_id": "rtb-1",
                "acl": "public-read",
                "timeouts": {"delete": "10m"}
            }))
        );
    }

    #[test]
    fn test_unknown_type_is_kept_unnormalized() {
        let factory = factory();
        let raw = attrs(json!({"arn": "arn:aws:x", "empty": null}));
        let res = factory.create_abstract_resource("aws_mystery", "m-1", raw.clone());

        assert!(!res.is_supported());
        assert_eq!(res.attributes(), &raw);
        assert_eq!(factory.unsupported_types(), vec![ResourceType::new("aws_mystery")]);
    }
}
