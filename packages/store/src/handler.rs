//! Adapter from form-input change events to path writes.

use pathstate_core::{normalize_path, Path, Value};

/// The element that changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputTarget {
    /// Field path, dotted (`"user.address.city"`) or plain.
    pub name: String,
    /// Input type, e.g. `"text"` or `"checkbox"`.
    pub kind: String,
    pub value: Value,
    pub checked: Option<bool>,
}

/// A change event carrying its target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputEvent {
    pub target: InputTarget,
}

impl InputEvent {
    pub fn text(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            target: InputTarget {
                name: name.into(),
                kind: "text".to_string(),
                value: value.into(),
                checked: None,
            },
        }
    }

    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        Self {
            target: InputTarget {
                name: name.into(),
                kind: "checkbox".to_string(),
                value: Value::Null,
                checked: Some(checked),
            },
        }
    }

    /// The path named by the target.
    pub fn path(&self) -> Path {
        normalize_path([self.target.name.as_str()])
    }

    /// The value the event carries: the checked state for checkboxes, the
    /// input value otherwise.
    pub fn value(&self) -> Value {
        if self.target.kind == "checkbox" {
            Value::Bool(self.target.checked.unwrap_or(false))
        } else {
            self.target.value.clone()
        }
    }
}

/// Wrap a path setter into an event handler.
///
/// # Example
///
/// ```rust
/// use pathstate::{path, wrap_handler, Container, InputEvent, Store, Value};
///
/// let store = Store::new(serde_json::json!({"user": {}}));
/// let writer = store.clone();
/// let on_change = wrap_handler(move |path, value| writer.set(&path, value));
///
/// on_change(&InputEvent::text("user.name", "John")).unwrap();
/// on_change(&InputEvent::checkbox("user.active", true)).unwrap();
///
/// assert_eq!(store.get_at(&path!("user.name")), Some(Value::from("John")));
/// assert_eq!(store.get_at(&path!("user.active")), Some(Value::Bool(true)));
/// ```
pub fn wrap_handler<F, R>(setter: F) -> impl Fn(&InputEvent) -> R
where
    F: Fn(Path, Value) -> R,
{
    move |event| setter(event.path(), event.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathstate_core::path;
    use std::cell::RefCell;

    #[test]
    fn text_input_sets_value_at_name() {
        let calls = RefCell::new(Vec::new());
        let handler = wrap_handler(|path, value| calls.borrow_mut().push((path, value)));

        handler(&InputEvent::text("user.name", "John"));

        assert_eq!(
            *calls.borrow(),
            vec![(path!("user", "name"), Value::from("John"))]
        );
    }

    #[test]
    fn checkbox_uses_checked_state() {
        let calls = RefCell::new(Vec::new());
        let handler = wrap_handler(|path, value| calls.borrow_mut().push((path, value)));

        handler(&InputEvent::checkbox("user.active", true));
        handler(&InputEvent {
            target: InputTarget {
                name: "user.active".to_string(),
                kind: "checkbox".to_string(),
                value: Value::from("on"),
                checked: None,
            },
        });

        assert_eq!(
            *calls.borrow(),
            vec![
                (path!("user.active"), Value::Bool(true)),
                (path!("user.active"), Value::Bool(false)),
            ]
        );
    }

    #[test]
    fn out_of_range_index_from_input_appends() {
        use crate::Store;
        use pathstate_core::Container;

        let store = Store::new(serde_json::json!({"items": ["a"]}));
        let writer = store.clone();
        let handler = wrap_handler(move |path, value| writer.set(&path, value));

        handler(&InputEvent::text("items.18446744073709551615", "b")).unwrap();

        assert_eq!(
            store.get_at(&path!("items")),
            Some(Value::from(serde_json::json!(["a", "b"])))
        );
    }

    #[test]
    fn indexed_names_normalize() {
        let event = InputEvent::text("todos.2.title", "Walk");
        assert_eq!(event.path(), path!("todos", 2, "title"));
    }
}
