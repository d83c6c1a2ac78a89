//! pathstate: path-addressable state containers.
//!
//! A [`Store`] holds one immutable snapshot. Any nested field is read and
//! written by path, every write publishes a new snapshot that shares all
//! untouched subtrees with the previous one, and subscribers are notified
//! synchronously.
//!
//! Derived containers compose over anything implementing [`Container`]:
//! - [`Focus`]: a container scoped to a fixed path prefix of its parent
//! - [`ListAdapter`]: identity-keyed add/update/remove over a sequence
//!
//! # Example
//!
//! ```rust
//! use pathstate::{path, Container, Focus, Store, Value};
//!
//! let store = Store::new(serde_json::json!({"name": "John", "address": {"city": "New York"}}));
//! let address = Focus::new(store.clone(), path!("address"));
//!
//! address.set(&path!("city"), "Paris").unwrap();
//!
//! assert_eq!(store.get_at(&path!("address.city")), Some(Value::from("Paris")));
//! ```

pub mod focus;
pub mod handler;
pub mod list;
pub mod store;

pub use focus::Focus;
pub use handler::{wrap_handler, InputEvent, InputTarget};
pub use list::ListAdapter;
pub use store::{Middleware, Store};

// Re-export core types for convenience
pub use pathstate_core::{
    normalize_path, path, update, Container, Error, Listener, Listeners, Path, PathArg, Segment,
    Subscription, Update, Value,
};
