//! Core value types and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value represents a decoded JSON/YAML value that can be any of the supported types.
///
/// Integral numbers decode to `Int`, every other number to `Float`. Both are
/// treated as the same loosely-typed numeric when patching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// Map represents a key-value map where keys are strings.
///
/// A patch mapping is a `Map`: key presence, not value truthiness, decides
/// whether a field is supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => write!(f, "[{} items]", items.len()),
            Value::Map(m) => write!(f, "{{{} keys}}", m.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder form of [`Map::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_numbers_split_by_integrality() {
        let v = from_json(r#"{"salary": 0, "rate": 2.5, "big": 1e3}"#).unwrap();
        let m = v.as_map().unwrap();
        assert_eq!(m.get("salary"), Some(&Value::Int(0)));
        assert_eq!(m.get("rate"), Some(&Value::Float(2.5)));
        assert_eq!(m.get("big"), Some(&Value::Float(1000.0)));
    }

    #[test]
    fn test_json_null_and_nested() {
        let v = from_json(r#"{"a": null, "b": {"c": false}}"#).unwrap();
        let m = v.as_map().unwrap();
        assert!(m.get("a").unwrap().is_null());
        let inner = m.get("b").unwrap().as_map().unwrap();
        assert_eq!(inner.get("c"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_yaml_decodes_like_json() {
        let y = from_yaml("name: Han\nsalary: 15\non_duty: true\n").unwrap();
        let j = from_json(r#"{"name":"Han","salary":15,"on_duty":true}"#).unwrap();
        assert_eq!(y, j);
    }

    #[test]
    fn test_map_operations() {
        let mut map = Map::new();
        assert!(map.is_empty());

        map.set("key", "value");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key"), Some(&Value::String("value".into())));
        assert!(map.get("other").is_none());
    }

    #[test]
    fn test_to_json_keeps_int_and_float_apart() {
        let value = Value::Map(Map::new().with("count", 42i64).with("ratio", 0.5));
        assert_eq!(to_json(&value).unwrap(), r#"{"count":42,"ratio":0.5}"#);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::Float(1.0).kind_name(), "float");
        assert_eq!(Value::List(vec![]).kind_name(), "list");
    }
}
