//! Turns raw JSON attribute objects into resources

use crate::attributes::Attributes;
use crate::error::{Error, Result};
use crate::factory::ResourceFactory;
use crate::resource::Resource;
use serde_json::Value;
use std::sync::Arc;

/// Deserializes raw attribute objects through a [`ResourceFactory`].
///
/// Each object must carry a string `id` attribute.
#[derive(Clone)]
pub struct Deserializer {
    factory: Arc<dyn ResourceFactory>,
}

impl Deserializer {
    pub fn new(factory: Arc<dyn ResourceFactory>) -> Self {
        Self { factory }
    }

    pub fn deserialize(&self, ty: &str, values: Vec<Value>) -> Result<Vec<Resource>> {
        values
            .into_iter()
            .map(|value| self.deserialize_one(ty, value))
            .collect()
    }

    pub fn deserialize_one(&self, ty: &str, value: Value) -> Result<Resource> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::NotAnObject {
                    ty: ty.to_string(),
                    found: kind(&other),
                });
            }
        };

        let attributes = Attributes::from(map);
        let id = attributes
            .get_non_empty_str("id")
            .ok_or_else(|| Error::MissingId { ty: ty.to_string() })?
            .to_string();

        Ok(self.factory.create_abstract_resource(ty, &id, attributes))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
