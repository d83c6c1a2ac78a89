//! Identity-keyed collection operations over a container holding a sequence.

use std::sync::Arc;

use pathstate_core::{
    update, Container, Error, Listener, Listeners, Path, Subscription, Update, Value,
};

type Identity = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A list view over a container whose value is an array.
///
/// Items are located by identity: the identity function maps an item to a
/// key, and two items are the same item when their keys are equal. The
/// default identity is the item itself.
///
/// Like [`Focus`](crate::Focus), the adapter is a [`Container`] with its own
/// listener set, fired after every write made through the adapter;
/// `get_data` and `set_at` pass through to the wrapped container.
///
/// # Example
///
/// ```rust
/// use pathstate::{path, Focus, ListAdapter, Store, Update, Value};
///
/// let store = Store::new(serde_json::json!({
///     "users": [{"id": 1, "name": "John"}, {"id": 2, "name": "Jane"}]
/// }));
/// let users = ListAdapter::with_identity(Focus::new(store, path!("users")), |user| {
///     user.get(&path!("id")).cloned().unwrap_or_default()
/// });
///
/// let jane = Value::from(serde_json::json!({"id": 2}));
/// assert!(users.update_item(&jane, &path!("name"), Update::replace("Jack")).unwrap());
/// assert_eq!(users.items()[1].get(&path!("name")), Some(&Value::from("Jack")));
/// ```
#[derive(Clone)]
pub struct ListAdapter<C> {
    container: C,
    identity: Identity,
    listeners: Listeners,
}

impl<C: Container> ListAdapter<C> {
    /// An adapter that identifies items by value.
    pub fn new(container: C) -> Self {
        Self::with_identity(container, Value::clone)
    }

    /// An adapter that identifies items by `identity(item)`.
    pub fn with_identity<F>(container: C, identity: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            container,
            identity: Arc::new(identity),
            listeners: Listeners::new(),
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    /// The current items; an absent or `Null` list reads as empty.
    pub fn items(&self) -> Vec<Value> {
        match self.container.get_data() {
            Some(Value::Array(items)) => items.to_vec(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                log::warn!("List adapter found a {} instead of an array", other.kind());
                Vec::new()
            }
        }
    }

    /// Position of the first item with the same identity as `item`.
    pub fn position(&self, item: &Value) -> Option<usize> {
        let key = (self.identity)(item);
        self.items()
            .iter()
            .position(|candidate| (self.identity)(candidate) == key)
    }

    /// Replace the whole list.
    pub fn set_items(&self, items: Vec<Value>) -> Result<(), Error> {
        self.set_at(&Path::root(), Update::Replace(Value::from(items)))
            .map(|_| ())
    }

    /// Append `item` to the end of the list.
    pub fn add_item(&self, item: impl Into<Value>) -> Result<(), Error> {
        let item = item.into();
        self.set_at(
            &Path::root(),
            Update::mutate(move |list| {
                if list.is_null() {
                    *list = Value::array();
                }
                list.push(item);
            }),
        )
        .map(|_| ())
    }

    /// Apply `change` at `path` inside the item with the same identity as `item`.
    ///
    /// Uses the same replace/transform/mutate semantics as
    /// [`Container::set_at`], relative to the matched element; pass the root
    /// path to act on the whole element. The lookup runs inside the write, so
    /// a concurrent write to the list cannot move the target.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - An item matched and was written.
    /// * `Ok(false)` - No item matched; the list is left untouched and no
    ///   listener runs.
    pub fn update_item(
        &self,
        item: &Value,
        path: &Path,
        change: Update<'_>,
    ) -> Result<bool, Error> {
        let key = (self.identity)(item);
        let identity = &self.identity;
        self.set_at(
            &Path::root(),
            Update::maybe(move |list| {
                let found = list.as_array().and_then(|items| {
                    items
                        .iter()
                        .position(|candidate| identity(candidate) == key)
                });
                let Some(index) = found else {
                    log::debug!("No list item matches {}; skipping update", key);
                    return None;
                };
                let target = Path::index(index).join(path);
                let leaf = change.apply(update::view(&list, &target))?;
                Some(update::assoc(&list, &target, leaf))
            }),
        )
    }

    /// Remove every item with the same identity as `item`.
    pub fn remove_item(&self, item: &Value) -> Result<(), Error> {
        let key = (self.identity)(item);
        let identity = self.identity.clone();
        self.set_at(
            &Path::root(),
            Update::transform(move |list| match list {
                Value::Array(items) => items
                    .iter()
                    .filter(|candidate| identity(*candidate) != key)
                    .cloned()
                    .collect(),
                Value::Null => Value::array(),
                other => other,
            }),
        )
        .map(|_| ())
    }
}

/// The adapter is itself a container: reads and writes pass through to the
/// wrapped container, and its own listeners fire after each write made
/// through it.
impl<C: Container> Container for ListAdapter<C> {
    fn get_at(&self, path: &Path) -> Option<Value> {
        self.container.get_at(path)
    }

    fn set_at(&self, path: &Path, change: Update<'_>) -> Result<bool, Error> {
        let published = self.container.set_at(path, change)?;
        if published {
            self.listeners.notify();
        }
        Ok(published)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}

impl<C> std::fmt::Debug for ListAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListAdapter")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
