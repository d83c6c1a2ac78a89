//! Serde Integration for pathstate
//!
//! This layer provides typed access to containers via serde. It adds:
//! - `TypedGetter`: Read directly into Rust types
//! - `TypedSetter`: Write Rust types directly
//! - Value <-> serde conversions
//!
//! # Example
//!
//! ```rust,ignore
//! use pathstate_serde::{TypedGetter, TypedSetter};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Address {
//!     city: String,
//! }
//!
//! let store = Store::new(Value::map());
//! store.set_as(&path!("address"), &Address { city: "Paris".into() })?;
//! let address: Option<Address> = store.get_as(&path!("address"))?;
//! ```

mod convert;
mod typed;

pub use convert::{from_value, to_value};
pub use typed::{TypedGetter, TypedSetter};

// Re-export core types for convenience
pub use pathstate_core::{Container, Error, Path, Value};
