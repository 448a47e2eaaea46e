//! Google Cloud resource metadata

use crate::aws::string_fields;
use crate::error::Result;
use crate::schema::{ProviderSchema, ResourceSchema, SchemaRepository};

pub const PROVIDER: &str = "google";
pub const DEFAULT_VERSION: &str = "3.78.0";

pub const GOOGLE_BIGQUERY_DATASET: &str = "google_bigquery_dataset";
pub const GOOGLE_COMPUTE_HEALTH_CHECK: &str = "google_compute_health_check";

pub fn builtin_schema() -> ProviderSchema {
    ProviderSchema::new()
        .with_resource(GOOGLE_BIGQUERY_DATASET, ResourceSchema::new())
        .with_resource(GOOGLE_COMPUTE_HEALTH_CHECK, ResourceSchema::new())
}

pub fn init(repo: &mut SchemaRepository, version: &str, schema: Option<ProviderSchema>) -> Result<()> {
    repo.init(PROVIDER, version, schema.unwrap_or_else(builtin_schema))?;
    init_metadata(repo);
    Ok(())
}

pub fn init_metadata(repo: &mut SchemaRepository) {
    repo.set_human_readable_fn(GOOGLE_BIGQUERY_DATASET, |attrs| {
        string_fields(attrs, &[("friendly_name", "name")])
    });
    repo.set_human_readable_fn(GOOGLE_COMPUTE_HEALTH_CHECK, |attrs| {
        string_fields(attrs, &[("name", "Name")])
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::factory::{ResourceFactory, SchemaResourceFactory};
    use std::sync::Arc;

    #[test]
    fn test_bigquery_dataset_name() {
        let mut repo = SchemaRepository::new();
        init(&mut repo, DEFAULT_VERSION, None).unwrap();
        let factory = SchemaResourceFactory::new(Arc::new(repo));

        let mut attrs = Attributes::new();
        attrs.insert("friendly_name", "Analytics");
        let res = factory.create_abstract_resource(GOOGLE_BIGQUERY_DATASET, "projects/p/datasets/a", attrs);

        assert_eq!(res.human_readable_attributes()["name"], "Analytics");
    }
}
