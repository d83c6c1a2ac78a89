//! Core pathstate: addressing and updating a shared value tree.
//!
//! - `Path`: Normalized address (field names and array indices)
//! - `Value`: Immutable tree with structural sharing
//! - `view` / `assoc` / `modify`: Structural-sharing reads and writes at a path
//! - `Container`: The read/write/subscribe capability every container kind provides
//!
//! # Example
//!
//! ```rust
//! use pathstate_core::{path, update, Value};
//!
//! let before = Value::from(serde_json::json!({"user": {"name": "John"}, "todos": []}));
//! let after = update::assoc(&before, &path!("user.name"), Value::from("Jane"));
//!
//! assert_eq!(after.get(&path!("user", "name")), Some(&Value::from("Jane")));
//! assert!(after.get(&path!("todos")).unwrap().ptr_eq(before.get(&path!("todos")).unwrap()));
//! ```

mod error;
mod listeners;
mod path;
mod traits;
pub mod update;
mod value;

pub use error::Error;
pub use listeners::{Listener, Listeners, Subscription};
pub use path::{normalize_path, Path, PathArg, Segment};
pub use traits::{Container, Update};
pub use value::Value;
