//! The container capability: read, write and watch a value by path.

use std::sync::Arc;

use crate::{Error, Listener, Path, Subscription, Value};

/// What to do with the value found at a path.
pub enum Update<'a> {
    /// Replace the value wholesale (no merging).
    Replace(Value),
    /// Compute the next value from the current one.
    Transform(Box<dyn FnOnce(Value) -> Value + 'a>),
    /// Edit a private draft of the current value in place.
    ///
    /// The draft shares structure with the published snapshot but is
    /// copy-on-write, so edits never leak into it.
    Mutate(Box<dyn FnOnce(&mut Value) + 'a>),
    /// Compute the next value, or `None` to leave the container untouched.
    ///
    /// A declined update publishes nothing and notifies no one.
    Maybe(Box<dyn FnOnce(Value) -> Option<Value> + 'a>),
}

impl<'a> Update<'a> {
    pub fn replace(value: impl Into<Value>) -> Self {
        Update::Replace(value.into())
    }

    pub fn transform(f: impl FnOnce(Value) -> Value + 'a) -> Self {
        Update::Transform(Box::new(f))
    }

    pub fn mutate(f: impl FnOnce(&mut Value) + 'a) -> Self {
        Update::Mutate(Box::new(f))
    }

    pub fn maybe(f: impl FnOnce(Value) -> Option<Value> + 'a) -> Self {
        Update::Maybe(Box::new(f))
    }

    /// Produce the next value for a target whose current value is `current`.
    ///
    /// An absent target is handed to closures as `Null`. `None` means the
    /// update was declined.
    pub fn apply(self, current: Option<&Value>) -> Option<Value> {
        let draft = || current.cloned().unwrap_or_default();
        match self {
            Update::Replace(value) => Some(value),
            Update::Transform(f) => Some(f(draft())),
            Update::Mutate(f) => {
                let mut draft = draft();
                f(&mut draft);
                Some(draft)
            }
            Update::Maybe(f) => f(draft()),
        }
    }
}

impl std::fmt::Debug for Update<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Update::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            Update::Transform(_) => f.write_str("Transform(..)"),
            Update::Mutate(_) => f.write_str("Mutate(..)"),
            Update::Maybe(_) => f.write_str("Maybe(..)"),
        }
    }
}

impl From<Value> for Update<'_> {
    fn from(value: Value) -> Self {
        Update::Replace(value)
    }
}

/// Anything that exposes a value by path: a root store, a focus over part of
/// another container, or a reference to either.
///
/// Implementors only provide the three primitive operations; the rest are
/// conveniences built on them.
///
/// # Object Safety
///
/// The required methods are object-safe, so `Box<dyn Container>` works; the
/// generic helpers are only available on sized implementors.
pub trait Container: Send + Sync {
    /// Read the value at `path` of the current snapshot.
    ///
    /// # Returns
    ///
    /// * `None` - The path does not resolve.
    /// * `Some(value)` - A shared handle to the value; cloning is cheap.
    fn get_at(&self, path: &Path) -> Option<Value>;

    /// Apply `update` at `path` and notify this container's listeners.
    ///
    /// The empty path targets the whole value.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A new value was published and listeners ran.
    /// * `Ok(false)` - The update was declined; nothing changed.
    fn set_at(&self, path: &Path, update: Update<'_>) -> Result<bool, Error>;

    /// Register a listener for this container's change notifications.
    fn subscribe(&self, listener: Listener) -> Subscription;

    /// The whole value.
    fn get_data(&self) -> Option<Value> {
        self.get_at(&Path::root())
    }

    /// Run a selector over the whole value and return its result.
    ///
    /// An absent value is presented to the selector as `Null`.
    fn select<R, F>(&self, selector: F) -> R
    where
        Self: Sized,
        F: FnOnce(&Value) -> R,
    {
        selector(&self.get_data().unwrap_or_default())
    }

    /// Replace the value at `path`.
    fn set(&self, path: &Path, value: impl Into<Value>) -> Result<(), Error>
    where
        Self: Sized,
    {
        self.set_at(path, Update::Replace(value.into())).map(|_| ())
    }

    /// Replace the value at `path` with `f` of its current value.
    fn update<F>(&self, path: &Path, f: F) -> Result<(), Error>
    where
        Self: Sized,
        F: FnOnce(Value) -> Value,
    {
        self.set_at(path, Update::transform(f)).map(|_| ())
    }

    /// Edit a draft of the value at `path`; the edited draft becomes the new value.
    fn mutate<F>(&self, path: &Path, f: F) -> Result<(), Error>
    where
        Self: Sized,
        F: FnOnce(&mut Value),
    {
        self.set_at(path, Update::mutate(f)).map(|_| ())
    }
}

// Blanket implementations for references and smart pointers

impl<T: Container + ?Sized> Container for &T {
    fn get_at(&self, path: &Path) -> Option<Value> {
        (**self).get_at(path)
    }

    fn set_at(&self, path: &Path, update: Update<'_>) -> Result<bool, Error> {
        (**self).set_at(path, update)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        (**self).subscribe(listener)
    }
}

impl<T: Container + ?Sized> Container for Box<T> {
    fn get_at(&self, path: &Path) -> Option<Value> {
        self.as_ref().get_at(path)
    }

    fn set_at(&self, path: &Path, update: Update<'_>) -> Result<bool, Error> {
        self.as_ref().set_at(path, update)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.as_ref().subscribe(listener)
    }
}

impl<T: Container + ?Sized> Container for Arc<T> {
    fn get_at(&self, path: &Path) -> Option<Value> {
        self.as_ref().get_at(path)
    }

    fn set_at(&self, path: &Path, update: Update<'_>) -> Result<bool, Error> {
        self.as_ref().set_at(path, update)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.as_ref().subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn replace_ignores_current() {
        let current = Value::from(1);
        assert_eq!(Update::replace(2).apply(Some(&current)), Some(Value::from(2)));
    }

    #[test]
    fn transform_receives_current_or_null() {
        let current = Value::from("john");
        let upper = |v: Value| Value::from(v.as_str().unwrap_or_default().to_uppercase());
        assert_eq!(
            Update::transform(upper).apply(Some(&current)),
            Some(Value::from("JOHN"))
        );
        assert_eq!(
            Update::transform(|v: Value| Value::from(v.is_null())).apply(None),
            Some(Value::from(true))
        );
    }

    #[test]
    fn mutate_edits_a_private_draft() {
        let current = Value::from(json!({"user": {"name": "John"}}));
        let next = Update::mutate(|draft: &mut Value| {
            draft.set(&path!("user.age"), 33);
            draft.insert("friends", Value::from(json!(["Jane"])));
        })
        .apply(Some(&current));

        assert_eq!(current, Value::from(json!({"user": {"name": "John"}})));
        assert_eq!(
            next,
            Some(Value::from(json!({"user": {"name": "John", "age": 33}, "friends": ["Jane"]})))
        );
    }

    #[test]
    fn maybe_may_decline() {
        let current = Value::from(json!([1, 2]));
        let declined = Update::maybe(|list: Value| list.as_array()?.get(5).cloned());
        assert_eq!(declined.apply(Some(&current)), None);

        let taken = Update::maybe(|list: Value| list.as_array()?.first().cloned());
        assert_eq!(taken.apply(Some(&current)), Some(Value::from(1)));
        assert_eq!(format!("{:?}", Update::maybe(|_| None)), "Maybe(..)");
    }

    #[test]
    fn debug_hides_closures() {
        assert_eq!(format!("{:?}", Update::mutate(|_| {})), "Mutate(..)");
        assert_eq!(format!("{:?}", Update::replace(1)), "Replace(Integer(1))");
    }
}
