//! Containers scoped to a path prefix of another container.

use pathstate_core::{Container, Error, Listener, Listeners, Path, Subscription, Update, Value};

/// A view of `parent` rooted at `prefix`.
///
/// Reads and writes are forwarded to the parent with the prefix prepended, so
/// they always see and produce the parent's current state. A focus keeps its
/// own listener set: its listeners fire after writes made through this focus
/// (or a clone of it), not after writes made elsewhere in the parent.
///
/// Focuses nest; `Focus::new(Focus::new(root, path!("a")), path!("b"))`
/// behaves like `Focus::new(root, path!("a.b"))`.
///
/// # Example
///
/// ```rust
/// use pathstate::{path, Container, Focus, Store, Value};
///
/// let store = Store::new(serde_json::json!({"users": [{"name": "John"}]}));
/// let first = Focus::new(store.clone(), path!("users", 0));
///
/// assert_eq!(first.get_at(&path!("name")), Some(Value::from("John")));
/// first.set(&path!("name"), "Jane").unwrap();
/// assert_eq!(store.get_at(&path!("users.0.name")), Some(Value::from("Jane")));
/// ```
#[derive(Clone)]
pub struct Focus<C> {
    parent: C,
    prefix: Path,
    listeners: Listeners,
}

impl<C: Container> Focus<C> {
    pub fn new(parent: C, prefix: Path) -> Self {
        Self {
            parent,
            prefix,
            listeners: Listeners::new(),
        }
    }

    /// The path this focus is rooted at, relative to its parent.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn parent(&self) -> &C {
        &self.parent
    }
}

impl<C: Container> Container for Focus<C> {
    fn get_at(&self, path: &Path) -> Option<Value> {
        self.parent.get_at(&self.prefix.join(path))
    }

    fn set_at(&self, path: &Path, change: Update<'_>) -> Result<bool, Error> {
        let published = self.parent.set_at(&self.prefix.join(path), change)?;
        if published {
            self.listeners.notify();
        }
        Ok(published)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}

impl<C> std::fmt::Debug for Focus<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Focus")
            .field("prefix", &self.prefix.to_string())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
