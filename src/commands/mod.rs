pub mod scan;
pub mod state;

use crate::config::Config;
use anyhow::{Context, Result};
use resource::{Deserializer, Filter, Progress, SchemaRepository, SchemaResourceFactory};
use std::sync::Arc;
use tfstate::{StateLocation, StateReader};

/// Factory over every built-in provider schema.
pub(crate) fn resource_factory() -> Result<Arc<SchemaResourceFactory>> {
    let mut schemas = SchemaRepository::new();
    resource::init_builtin_providers(&mut schemas).context("Failed to load provider schemas")?;
    Ok(Arc::new(SchemaResourceFactory::new(Arc::new(schemas))))
}

pub(crate) fn state_reader(
    location: &str,
    config: &Config,
    factory: Arc<SchemaResourceFactory>,
    filter: Arc<dyn Filter>,
    progress: Arc<dyn Progress>,
) -> Result<StateReader> {
    let location = StateLocation::parse(location, &config.state.key)?;
    log::info!("Reading state from {location}");
    Ok(StateReader::new(
        location,
        Deserializer::new(factory),
        filter,
        progress,
    ))
}
