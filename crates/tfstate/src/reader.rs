//! Declared inventory from a state document

use crate::backend::{self, Backend};
use crate::document::{self, Mode};
use crate::error::{Error, Result};
use crate::location::StateLocation;
use resource::{Deserializer, Filter, Progress, Resource, ResourceType, Source, Supplier};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Reads one state document into resources.
///
/// Resources are built by the same [`Deserializer`] the cloud scanner uses,
/// so both inventories are normalized identically.
pub struct StateReader {
    location: StateLocation,
    backend: Box<dyn Backend>,
    deserializer: Deserializer,
    filter: Arc<dyn Filter>,
    progress: Arc<dyn Progress>,
}

impl StateReader {
    pub fn new(
        location: StateLocation,
        deserializer: Deserializer,
        filter: Arc<dyn Filter>,
        progress: Arc<dyn Progress>,
    ) -> Self {
        let backend = backend::for_location(&location);
        Self {
            location,
            backend,
            deserializer,
            filter,
            progress,
        }
    }

    /// Replace the backend derived from the location.
    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn Backend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn location(&self) -> &StateLocation {
        &self.location
    }

    /// Read, validate and deserialize the state.
    ///
    /// Progress is stopped whatever the outcome.
    pub fn resources(&self) -> Result<Vec<Resource>> {
        let result = self.read();
        self.progress.stop();
        result
    }

    fn read(&self) -> Result<Vec<Resource>> {
        let bytes = self.backend.read()?;
        let file = self.location.file_name();
        let state = document::parse(file, &bytes)?;
        log::debug!(
            "read {} written by Terraform {} ({} entries)",
            self.location,
            state.terraform_version,
            state.resources.len()
        );

        let source_state = self.location.source();
        let mut ignored_types: HashMap<String, bool> = HashMap::new();
        let mut resources = Vec::new();

        for entry in state.resources {
            if entry.mode == Mode::Data {
                log::debug!("skipping data source {}", entry.address());
                continue;
            }

            let ignored = *ignored_types
                .entry(entry.ty.clone())
                .or_insert_with(|| self.filter.is_type_ignored(&ResourceType::new(&entry.ty)));
            if ignored {
                log::debug!("ignoring {} by filter", entry.address());
                continue;
            }

            let address = entry.address();
            let module = entry.module.clone().unwrap_or_default();
            for instance in entry.instances {
                let suffix = instance.index_suffix();
                let resource = self
                    .deserializer
                    .deserialize_one(&entry.ty, Value::Object(instance.attributes))
                    .map_err(|source| Error::Instance {
                        file: file.to_string(),
                        address: format!("{address}{suffix}"),
                        source,
                    })?
                    .with_source(Source::new(&source_state, &module, &entry.name));

                self.progress.inc();
                if self.filter.is_resource_ignored(&resource) {
                    log::debug!("ignoring {} by filter", resource.key());
                    continue;
                }
                resources.push(resource);
            }
        }

        Ok(resources)
    }
}

impl Supplier for StateReader {
    type Error = Error;

    fn resources(&self) -> Result<Vec<Resource>> {
        StateReader::resources(self)
    }
}
