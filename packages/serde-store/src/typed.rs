//! Typed getter and setter extension traits.

use serde::de::DeserializeOwned;
use serde::Serialize;

use pathstate_core::{Container, Error, Path};

use crate::convert::{from_value, to_value};

/// Extension trait for typed reads.
///
/// This trait is automatically implemented for all `Container` implementations.
pub trait TypedGetter: Container {
    /// Read the value at `from` and deserialize it into a Rust type.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The path does not resolve.
    /// * `Ok(Some(value))` - The deserialized value.
    /// * `Err(Error::Decode)` - The value does not have the shape of `T`.
    fn get_as<T: DeserializeOwned>(&self, from: &Path) -> Result<Option<T>, Error> {
        let Some(value) = self.get_at(from) else {
            return Ok(None);
        };

        Ok(Some(from_value(value)?))
    }
}

impl<C: Container + ?Sized> TypedGetter for C {}

/// Extension trait for typed writes.
///
/// This trait is automatically implemented for all `Container` implementations.
pub trait TypedSetter: Container {
    /// Serialize `data` and write it at `to`, replacing what was there.
    fn set_as<T: Serialize + ?Sized>(&self, to: &Path, data: &T) -> Result<(), Error> {
        let value = to_value(data)?;
        self.set_at(to, value.into()).map(|_| ())
    }
}

impl<C: Container + ?Sized> TypedSetter for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use pathstate::{path, Focus, Store, Value};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Address {
        city: String,
        street: Option<String>,
    }

    #[test]
    fn get_as_reads_typed_value() {
        let store = Store::new(json!({"address": {"city": "New York", "street": null}}));

        let address: Address = store.get_as(&path!("address")).unwrap().unwrap();
        assert_eq!(
            address,
            Address {
                city: "New York".to_string(),
                street: None,
            }
        );

        let city: String = store.get_as(&path!("address.city")).unwrap().unwrap();
        assert_eq!(city, "New York");
    }

    #[test]
    fn get_as_missing_is_none() {
        let store = Store::new(json!({}));
        let missing: Option<Address> = store.get_as(&path!("address")).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn get_as_wrong_shape_is_error() {
        let store = Store::new(json!({"address": 12}));
        let result = store.get_as::<Address>(&path!("address"));
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn set_as_through_focus() {
        let store = Store::new(json!({"name": "John"}));
        let focus = Focus::new(store.clone(), path!("address"));

        focus
            .set_as(
                &path!(),
                &Address {
                    city: "Paris".to_string(),
                    street: Some("Rue de Rivoli".to_string()),
                },
            )
            .unwrap();

        assert_eq!(
            store.snapshot(),
            Value::from(json!({
                "name": "John",
                "address": {"city": "Paris", "street": "Rue de Rivoli"}
            }))
        );
    }

    #[test]
    fn works_on_trait_objects() {
        let store: Box<dyn Container> = Box::new(Store::new(json!({"count": 3})));
        store.set_as(&path!("count"), &4u32).unwrap();
        assert_eq!(store.get_as::<u32>(&path!("count")).unwrap(), Some(4));
    }
}
