//! Enumerator and details-fetcher contracts

use crate::error::{ApiError, DetailsError, EnumerationError};
use resource::{Deserializer, Resource, ResourceType};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lists every live resource of one type.
///
/// Implementations build resources through a
/// [`ResourceFactory`](resource::ResourceFactory) with identity-only seed
/// attributes, and wrap listing failures in an [`EnumerationError`]
/// naming [`supported_type`](Self::supported_type).
pub trait Enumerator: Send + Sync {
    fn supported_type(&self) -> ResourceType;

    fn enumerate(&self) -> Result<Vec<Resource>, EnumerationError>;
}

/// Hydrates a resource with its full attributes (deep mode).
///
/// Takes ownership of the resource for the duration of the fetch.
/// `Ok(None)` means the resource no longer exists.
pub trait DetailsFetcher: Send + Sync {
    fn read_details(&self, resource: Resource) -> Result<Option<Resource>, DetailsError>;
}

/// Arguments of a provider read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResourceArgs<'a> {
    pub ty: &'a ResourceType,
    pub id: &'a str,
    /// Natural-key attributes from the type's read-resolution function
    pub attributes: BTreeMap<String, String>,
}

/// Opaque provider able to read one resource's full state.
pub trait ResourceReader: Send + Sync {
    fn read_resource(&self, args: ReadResourceArgs<'_>) -> Result<Option<Value>, ApiError>;
}

/// [`DetailsFetcher`] reading through a [`ResourceReader`] and normalizing the
/// answer with the same deserializer the state reader uses.
pub struct GenericDetailsFetcher {
    ty: ResourceType,
    reader: Arc<dyn ResourceReader>,
    deserializer: Deserializer,
}

impl GenericDetailsFetcher {
    pub fn new(
        ty: impl Into<ResourceType>,
        reader: Arc<dyn ResourceReader>,
        deserializer: Deserializer,
    ) -> Self {
        Self {
            ty: ty.into(),
            reader,
            deserializer,
        }
    }
}

impl DetailsFetcher for GenericDetailsFetcher {
    fn read_details(&self, resource: Resource) -> Result<Option<Resource>, DetailsError> {
        let args = ReadResourceArgs {
            ty: &self.ty,
            id: resource.resource_id(),
            attributes: resource.read_attributes(),
        };

        let value = self.reader.read_resource(args).map_err(|source| DetailsError::Read {
            resource_type: self.ty.clone(),
            resource_id: resource.resource_id().to_string(),
            source,
        })?;

        let Some(mut value) = value else {
            log::warn!(
                "{} {} vanished before its details could be read",
                self.ty,
                resource.resource_id()
            );
            return Ok(None);
        };

        if let Value::Object(map) = &mut value {
            map.entry("id")
                .or_insert_with(|| Value::String(resource.resource_id().to_string()));
        }

        self.deserializer
            .deserialize_one(self.ty.as_str(), value)
            .map(Some)
            .map_err(|source| DetailsError::Deserialize {
                resource_type: self.ty.clone(),
                resource_id: resource.resource_id().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Provider;
    use resource::{Attributes, SchemaRepository, SchemaResourceFactory, aws};
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeReader {
        answer: Result<Option<Value>, ApiError>,
        seen: Mutex<Vec<(String, BTreeMap<String, String>)>>,
    }

    impl ResourceReader for FakeReader {
        fn read_resource(&self, args: ReadResourceArgs<'_>) -> Result<Option<Value>, ApiError> {
            self.seen
                .lock()
                .unwrap()
                .push((args.id.to_string(), args.attributes));
            self.answer.clone()
        }
    }

    fn fetcher(answer: Result<Option<Value>, ApiError>) -> (GenericDetailsFetcher, Arc<FakeReader>) {
        let mut repo = SchemaRepository::new();
        aws::init(&mut repo, aws::DEFAULT_VERSION, None).unwrap();
        let factory = Arc::new(SchemaResourceFactory::new(Arc::new(repo)));
        let reader = Arc::new(FakeReader {
            answer,
            seen: Mutex::new(Vec::new()),
        });
        let fetcher = GenericDetailsFetcher::new(
            aws::AWS_ROUTE,
            reader.clone(),
            Deserializer::new(factory),
        );
        (fetcher, reader)
    }

    fn route() -> Resource {
        let mut attrs = Attributes::new();
        attrs.insert("route_table_id", "rtb-1");
        attrs.insert("destination_cidr_block", "0.0.0.0/0");
        Resource::new(aws::AWS_ROUTE, "r-rtb-11080", attrs)
    }

    #[test]
    fn test_hydrates_and_normalizes() {
        let (fetcher, reader) = fetcher(Ok(Some(json!({
            "route_table_id": "rtb-1",
            "destination_cidr_block": "0.0.0.0/0",
            "gateway_id": "igw-1",
            "nat_gateway_id": "",
            "timeouts": {"create": "2m"}
        }))));

        let hydrated = fetcher.read_details(route()).unwrap().unwrap();
        assert_eq!(hydrated.resource_id(), "r-rtb-11080");
        assert_eq!(hydrated.attributes().get_str("gateway_id"), Some("igw-1"));
        assert!(!hydrated.attributes().contains_key("timeouts"));
        assert!(!hydrated.attributes().contains_key("nat_gateway_id"));

        let seen = reader.seen.lock().unwrap();
        assert_eq!(seen[0].1["route_table_id"], "rtb-1");
    }

    #[test]
    fn test_vanished_resource_is_skipped() {
        let (fetcher, _) = fetcher(Ok(None));
        assert!(fetcher.read_details(route()).unwrap().is_none());
    }

    #[test]
    fn test_read_failure_is_wrapped() {
        let denied = ApiError::new(Provider::Aws, "denied").with_status(403);
        let (fetcher, _) = fetcher(Err(denied));

        let err = fetcher.read_details(route()).unwrap_err();
        assert!(err.is_access_denied());
        assert!(matches!(err, DetailsError::Read { ref resource_id, .. } if resource_id == "r-rtb-11080"));
    }
}
