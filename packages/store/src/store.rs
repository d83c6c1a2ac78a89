//! The root container.

use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};

use pathstate_core::{
    update, Container, Error, Listener, Listeners, Path, Subscription, Update, Value,
};

/// A post-update transform applied to every new snapshot, including the
/// initial one.
///
/// Middleware sees a value that is not yet published; returning an error
/// aborts the write that produced it.
#[derive(Clone)]
pub struct Middleware {
    apply: Arc<dyn Fn(Value) -> Result<Value, Error> + Send + Sync>,
}

impl Middleware {
    /// Middleware that passes every snapshot through unchanged.
    pub fn identity() -> Self {
        Self::map(|value| value)
    }

    /// Fallible middleware.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self { apply: Arc::new(f) }
    }

    /// Infallible middleware returning the next snapshot.
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::new(move |value| Ok(f(value)))
    }

    /// Infallible middleware that edits a draft of the snapshot in place.
    pub fn mutating<F>(f: F) -> Self
    where
        F: Fn(&mut Value) + Send + Sync + 'static,
    {
        Self::map(move |mut draft| {
            f(&mut draft);
            draft
        })
    }

    pub fn apply(&self, value: Value) -> Result<Value, Error> {
        (self.apply)(value)
    }
}

impl Default for Middleware {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Middleware(..)")
    }
}

struct Shared {
    snapshot: RwLock<Value>,
    /// Serializes read-modify-publish-notify. Re-entrant so a listener running
    /// on the writing thread may write again. A write made from inside an
    /// update closure is lost: the outer write publishes a tree built from
    /// the snapshot it started with.
    writer: ReentrantMutex<()>,
    middleware: Middleware,
    listeners: Listeners,
}

/// A container that owns its snapshot.
///
/// `Store` is a handle: clones share the same snapshot and listeners.
///
/// # Example
///
/// ```rust
/// use pathstate::{path, Container, Store, Value};
///
/// let store = Store::new(serde_json::json!({"user": {"name": "John"}}));
///
/// store.set(&path!("user.name"), "Billy").unwrap();
/// store.update(&path!("user", "name"), |name| {
///     Value::from(name.as_str().unwrap_or_default().to_uppercase())
/// }).unwrap();
///
/// assert_eq!(store.get_at(&path!("user.name")), Some(Value::from("BILLY")));
/// ```
#[derive(Clone)]
pub struct Store {
    shared: Arc<Shared>,
}

impl Store {
    /// Create a store without middleware.
    pub fn new(initial: impl Into<Value>) -> Self {
        Self::from_parts(initial.into(), Middleware::identity())
    }

    /// Create a store whose snapshots all pass through `middleware`.
    ///
    /// The middleware runs once on `initial` before the store is returned; its
    /// error, if any, is returned instead of a store.
    pub fn with_middleware(
        initial: impl Into<Value>,
        middleware: Middleware,
    ) -> Result<Self, Error> {
        let initial = middleware.apply(initial.into())?;
        Ok(Self::from_parts(initial, middleware))
    }

    fn from_parts(initial: Value, middleware: Middleware) -> Self {
        Self {
            shared: Arc::new(Shared {
                snapshot: RwLock::new(initial),
                writer: ReentrantMutex::new(()),
                middleware,
                listeners: Listeners::new(),
            }),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Value {
        self.shared.snapshot.read().clone()
    }

    /// True when both handles refer to the same store.
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Value::map())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("snapshot", &*self.shared.snapshot.read())
            .field("listeners", &self.shared.listeners.len())
            .finish()
    }
}

impl Container for Store {
    fn get_at(&self, path: &Path) -> Option<Value> {
        update::view(&self.shared.snapshot.read(), path).cloned()
    }

    fn set_at(&self, path: &Path, change: Update<'_>) -> Result<bool, Error> {
        let _writer = self.shared.writer.lock();

        // Work from a cheap clone so updaters may read the store freely.
        let current = self.snapshot();
        let Some(leaf) = change.apply(update::view(&current, path)) else {
            log::debug!("Update at '{}' declined; nothing published", path);
            return Ok(false);
        };
        let next = update::assoc(&current, path, leaf);
        let next = self.shared.middleware.apply(next).inspect_err(|e| {
            log::debug!("Discarding write at '{}': {}", path, e);
        })?;

        *self.shared.snapshot.write() = next;
        log::trace!("Published snapshot after write at '{}'", path);

        self.shared.listeners.notify();
        Ok(true)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.shared.listeners.add(listener)
    }
}
