//! Change listeners shared by every container kind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// A zero-argument change callback.
///
/// Listeners carry no payload; read the container again to see the new state.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

struct Entry {
    id: u64,
    active: Arc<AtomicBool>,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// A set of listeners with snapshot-on-notify semantics.
///
/// `notify` copies the current entries before calling any of them, so a
/// listener may subscribe or unsubscribe (itself or others) while a
/// notification pass is running:
/// - listeners added during a pass are first called on the next pass;
/// - a listener removed during a pass is not called again, not even later in
///   the same pass.
///
/// Listeners run in subscription order.
#[derive(Clone, Default)]
pub struct Listeners {
    registry: Arc<Mutex<Registry>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add(&self, listener: Listener) -> Subscription {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;

        let active = Arc::new(AtomicBool::new(true));
        registry.entries.push(Entry {
            id,
            active: active.clone(),
            listener,
        });

        Subscription {
            id,
            active,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Call every listener registered at the start of this call.
    pub fn notify(&self) {
        let pass: Vec<(Arc<AtomicBool>, Listener)> = self
            .registry
            .lock()
            .entries
            .iter()
            .map(|entry| (entry.active.clone(), entry.listener.clone()))
            .collect();

        for (active, listener) in pass {
            if active.load(Ordering::Acquire) {
                listener();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.registry.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Deregister the listener. Idempotent, and harmless once the container is gone.
    pub fn unsubscribe(&self) {
        self.active.store(false, Ordering::Release);
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().entries.retain(|entry| entry.id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
