//! Attribute maps and the primitives normalization functions are built from

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered, arbitrarily nested attribute map of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of a top-level attribute, `None` if absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Non-empty string value of a top-level attribute.
    pub fn get_non_empty_str(&self, key: &str) -> Option<&str> {
        self.get_str(key).filter(|s| !s.is_empty())
    }

    /// Value at a nested path of object keys.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, key| value.as_object()?.get(*key))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Remove the value at a nested path. Missing segments are a no-op.
    pub fn safe_delete(&mut self, path: &[&str]) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = &mut self.0;
        for key in parents {
            match current.get_mut(*key).and_then(Value::as_object_mut) {
                Some(next) => current = next,
                None => return,
            }
        }
        current.remove(*last);
    }

    /// Remove a top-level attribute if it holds its type's zero value.
    pub fn delete_if_default(&mut self, key: &str) {
        if self.0.get(key).is_some_and(is_zero) {
            self.0.remove(key);
        }
    }

    /// Recursively drop nulls and empty collections.
    ///
    /// State documents and API responses disagree on whether an unset
    /// attribute is absent, null or empty; after this they agree.
    pub fn sanitize_defaults(&mut self) {
        let map = std::mem::take(&mut self.0);
        self.0 = map
            .into_iter()
            .filter_map(|(key, value)| sanitize(value).map(|value| (key, value)))
            .collect();
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Whether a value is the zero value of its JSON type.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn sanitize(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, value)| sanitize(value).map(|value| (key, value)))
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(sanitize).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => Attributes::from(map),
            _ => panic!("test attributes must be an object"),
        }
    }

    #[test]
    fn test_get_str() {
        let a = attrs(json!({"name": "bucket", "size": 3, "empty": ""}));
        assert_eq!(a.get_str("name"), Some("bucket"));
        assert_eq!(a.get_str("size"), None);
        assert_eq!(a.get_str("missing"), None);
        assert_eq!(a.get_non_empty_str("empty"), None);
    }

    #[test]
    fn test_get_path() {
        let a = attrs(json!({"versioning": {"enabled": true}}));
        assert_eq!(a.get_path(&["versioning", "enabled"]), Some(&json!(true)));
        assert_eq!(a.get_path(&["versioning", "mfa_delete"]), None);
        assert_eq!(a.get_path(&[]), None);
    }

    #[test]
    fn test_safe_delete_nested() {
        let mut a = attrs(json!({"timeouts": {"create": "5m", "delete": "5m"}, "arn": "x"}));
        a.safe_delete(&["timeouts", "create"]);
        assert_eq!(a.get("timeouts"), Some(&json!({"delete": "5m"})));

        a.safe_delete(&["arn"]);
        assert!(!a.contains_key("arn"));
    }

    #[test]
    fn test_safe_delete_missing_path_is_noop() {
        let mut a = attrs(json!({"arn": "x", "tags": "not-an-object"}));
        let before = a.clone();
        a.safe_delete(&["timeouts", "create"]);
        a.safe_delete(&["tags", "Name"]);
        a.safe_delete(&[]);
        assert_eq!(a, before);
    }

    #[test]
    fn test_delete_if_default() {
        let mut a = attrs(json!({
            "throughput": 0,
            "nat_gateway_id": "",
            "enabled": false,
            "size": 8,
            "instance_id": "i-123"
        }));
        for key in ["throughput", "nat_gateway_id", "enabled", "size", "instance_id", "absent"] {
            a.delete_if_default(key);
        }
        assert_eq!(a, attrs(json!({"size": 8, "instance_id": "i-123"})));
    }

    #[test]
    fn test_sanitize_defaults() {
        let mut a = attrs(json!({
            "tags": {},
            "policy": null,
            "rules": [null, {"cidr": null}],
            "nested": {"keep": 1, "drop": null},
            "flag": false
        }));
        a.sanitize_defaults();
        assert_eq!(a, attrs(json!({"nested": {"keep": 1}, "flag": false})));

        let once = a.clone();
        a.sanitize_defaults();
        assert_eq!(a, once);
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(&json!(0.0)));
        assert!(is_zero(&json!([])));
        assert!(!is_zero(&json!(-1)));
        assert!(!is_zero(&json!(true)));
    }
}
