//! Conversions between Value and serde types.

use serde::de::DeserializeOwned;
use serde::Serialize;

use pathstate_core::{Error, Value};

/// Convert a Value to a Rust type via serde.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(serde_json::Value::from(value)).map_err(|e| Error::decode(e.to_string()))
}

/// Convert a Rust type to a Value via serde.
pub fn to_value<T: Serialize + ?Sized>(data: &T) -> Result<Value, Error> {
    serde_json::to_value(data)
        .map(Value::from)
        .map_err(|e| Error::encode(e.to_string()))
}
