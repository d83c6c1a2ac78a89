//! The Value type - a shared, immutable tree.
//!
//! Composite nodes live behind `Arc`, so cloning a value only bumps reference
//! counts and every snapshot can share untouched subtrees with its
//! predecessor. All mutation goes through `Arc::make_mut`: a node shared with
//! anyone else is copied before it is changed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::update;
use crate::Path;

/// A tree-shaped value held by a container.
///
/// # Design Notes
///
/// - Uses `BTreeMap` for deterministic ordering (important for comparison and display)
/// - `PartialEq` is structural; use [`Value::ptr_eq`] to ask whether two
///   composites are the very same node
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    String(String),
    /// Ordered sequence of values.
    Array(Arc<Vec<Value>>),
    /// Key-value map with string keys.
    Map(Arc<BTreeMap<String, Value>>),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(Arc::new(BTreeMap::new()))
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Arc::new(Vec::new()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map.as_ref()),
            _ => None,
        }
    }

    /// Mutable access to the array, copying it first if it is shared.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(Arc::make_mut(items)),
            _ => None,
        }
    }

    /// Mutable access to the map, copying it first if it is shared.
    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(Arc::make_mut(map)),
            _ => None,
        }
    }

    /// True when both values are composites backed by the same allocation.
    ///
    /// Scalars carry no identity and always return `false`.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Get a reference to a nested value by path.
    ///
    /// Returns `None` if the path doesn't exist or can't be navigated
    /// (e.g., trying to index into a string).
    pub fn get(&self, path: &Path) -> Option<&Value> {
        update::view(self, path)
    }

    /// Get a mutable reference to a nested value by path.
    ///
    /// Every node on the way is unshared first, so writing through the
    /// returned reference never affects another holder of this tree.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Value> {
        let mut current = self;
        for segment in path {
            current = match current {
                Value::Map(map) => Arc::make_mut(map).get_mut(segment.as_key()?)?,
                Value::Array(items) => Arc::make_mut(items).get_mut(segment.as_index()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Set a value at a path, creating intermediate nodes as needed.
    ///
    /// Follows the same shape rules as [`update::assoc`].
    pub fn set(&mut self, path: &Path, value: impl Into<Value>) {
        *self = update::assoc(self, path, value.into());
    }

    /// Insert a field, turning a non-map into an empty map first.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        if !self.is_map() {
            *self = Value::map();
        }
        if let Some(map) = self.as_map_mut() {
            map.insert(key.into(), value.into());
        }
    }

    /// Append an element, turning a non-array into an empty array first.
    pub fn push(&mut self, value: impl Into<Value>) {
        if !self.is_array() {
            *self = Value::array();
        }
        if let Some(items) = self.as_array_mut() {
            items.push(value.into());
        }
    }

    /// Remove a field or element at a path, returning it if it existed.
    pub fn remove(&mut self, path: &Path) -> Option<Value> {
        let (last, parent_path) = (path.last()?, path.parent()?);
        match self.get_mut(&parent_path)? {
            Value::Map(map) => Arc::make_mut(map).remove(last.as_key()?),
            Value::Array(items) => {
                let index = last.as_index()?;
                if index < items.len() {
                    Some(Arc::make_mut(items).remove(index))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Short name of the variant, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::Value::from(self.clone()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Integer(i as i64)
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

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(Arc::new(map))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    // Fallback for very large numbers
                    Value::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => items.into_iter().map(Value::from).collect(),
            serde_json::Value::Object(map) => Value::from(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => serde_json::Value::Array(
                items.iter().cloned().map(serde_json::Value::from).collect(),
            ),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v.clone())))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    fn sample() -> Value {
        Value::from(json!({
            "name": "Alice",
            "address": { "city": "NYC" },
            "scores": [90, 85, 95]
        }))
    }

    #[test]
    fn json_conversion_preserves_structure() {
        let json = json!({"a": [1, 2.5, "x", null, true], "b": {"c": {}}});
        let value = Value::from(json.clone());
        assert_eq!(serde_json::Value::from(value), json);
    }

    #[test]
    fn get_navigates_maps_and_arrays() {
        let v = sample();
        assert_eq!(v.get(&path!("address.city")), Some(&Value::from("NYC")));
        assert_eq!(v.get(&path!("scores", 1)), Some(&Value::Integer(85)));
        assert_eq!(v.get(&path!("scores", 9)), None);
        assert_eq!(v.get(&path!("name.first")), None);
    }

    #[test]
    fn clones_share_composites() {
        let v = sample();
        let copy = v.clone();
        assert!(v.ptr_eq(&copy));
        assert!(v
            .get(&path!("address"))
            .unwrap()
            .ptr_eq(copy.get(&path!("address")).unwrap()));
        assert!(!Value::from(1).ptr_eq(&Value::from(1)));
    }

    #[test]
    fn get_mut_copies_on_write() {
        let original = sample();
        let mut draft = original.clone();

        *draft.get_mut(&path!("address.city")).unwrap() = Value::from("Paris");

        assert_eq!(original.get(&path!("address.city")), Some(&Value::from("NYC")));
        assert_eq!(draft.get(&path!("address.city")), Some(&Value::from("Paris")));
        // The untouched branch is still shared.
        assert!(original
            .get(&path!("scores"))
            .unwrap()
            .ptr_eq(draft.get(&path!("scores")).unwrap()));
    }

    #[test]
    fn insert_and_push_coerce_shape() {
        let mut v = Value::Null;
        v.insert("friends", Value::array());
        v.get_mut(&path!("friends")).unwrap().push("Jane");
        assert_eq!(v, Value::from(json!({"friends": ["Jane"]})));

        let mut scalar = Value::from(3);
        scalar.push(1);
        assert_eq!(scalar, Value::from(json!([1])));
    }

    #[test]
    fn remove_from_map_and_array() {
        let mut v = sample();
        assert_eq!(v.remove(&path!("name")), Some(Value::from("Alice")));
        assert_eq!(v.remove(&path!("scores.0")), Some(Value::Integer(90)));
        assert_eq!(v.remove(&path!("scores.7")), None);
        assert_eq!(v.remove(&path!()), None);
        assert_eq!(v.get(&path!("scores")), Some(&Value::from(json!([85, 95]))));
    }

    #[test]
    fn serde_round_trip_through_json_text() {
        let v = sample();
        let text = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn display_renders_json() {
        assert_eq!(Value::from(json!({"a": [1]})).to_string(), r#"{"a":[1]}"#);
    }
}
