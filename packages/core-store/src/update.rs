//! Structural-sharing reads and writes at a path.
//!
//! `assoc` rebuilds only the chain of nodes from the root to the target. Each
//! visited map or array is shallow-copied (its children are `Arc` clones),
//! so every sibling subtree of the new tree is the same allocation as in the
//! old one and the old tree is left untouched.
//!
//! Shape conflicts are resolved by the segment kind:
//! - a field-name segment over anything but a map starts a fresh map;
//! - an index segment over anything but an array starts a fresh array;
//! - an index past the end pads the array with `Null`, up to
//!   [`MAX_PADDING`] new elements; an index further out appends instead.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{Path, Segment, Value};

/// Most `Null` elements a single write may pad an array with.
pub const MAX_PADDING: usize = 1024;

/// Resolve `path` inside `tree`.
///
/// Any miss yields `None`: a missing key, an out-of-bounds index, a key
/// segment against an array, an index segment against a map, or descent
/// into a scalar.
pub fn view<'a>(tree: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut cursor = tree;
    for segment in path {
        cursor = match (cursor, segment) {
            (Value::Map(map), Segment::Key(key)) => map.get(key.as_str())?,
            (Value::Array(items), Segment::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(cursor)
}

/// Return a new tree equal to `tree` with `leaf` placed at `path`.
pub fn assoc(tree: &Value, path: &Path, leaf: Value) -> Value {
    assoc_segments(tree, &path.segments, leaf)
}

/// Return a new tree with the value at `path` replaced by `f` of the current one.
pub fn modify<F>(tree: &Value, path: &Path, f: F) -> Value
where
    F: FnOnce(Option<&Value>) -> Value,
{
    let leaf = f(view(tree, path));
    assoc(tree, path, leaf)
}

fn assoc_segments(node: &Value, segments: &[Segment], leaf: Value) -> Value {
    let Some((head, rest)) = segments.split_first() else {
        return leaf;
    };

    match head {
        Segment::Key(key) => {
            let mut map = match node {
                Value::Map(map) => BTreeMap::clone(map),
                other => {
                    coerced(other, head);
                    BTreeMap::new()
                }
            };
            let child = map.get(key.as_str()).cloned().unwrap_or_default();
            map.insert(key.clone(), assoc_segments(&child, rest, leaf));
            Value::Map(Arc::new(map))
        }
        Segment::Index(index) => {
            let mut items = match node {
                Value::Array(items) => Vec::clone(items),
                other => {
                    coerced(other, head);
                    Vec::new()
                }
            };
            let index = slot(&mut items, *index);
            let child = std::mem::take(&mut items[index]);
            items[index] = assoc_segments(&child, rest, leaf);
            Value::Array(Arc::new(items))
        }
    }
}

/// Make room for `index` and return the position actually written.
fn slot(items: &mut Vec<Value>, index: usize) -> usize {
    let len = items.len();
    if index < len {
        return index;
    }
    if index - len > MAX_PADDING {
        log::warn!(
            "Index {} is too far past the end of a {}-element array; appending instead",
            index,
            len
        );
        items.push(Value::Null);
        return len;
    }
    items.resize(index + 1, Value::Null);
    index
}

fn coerced(node: &Value, segment: &Segment) {
    // Writing below a missing node is the common case and not worth a log line.
    if !node.is_null() {
        log::debug!(
            "Replacing {} with a new {} to write segment '{}'",
            node.kind(),
            match segment {
                Segment::Key(_) => "map",
                Segment::Index(_) => "array",
            },
            segment
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    fn tree() -> Value {
        Value::from(json!({
            "name": "John",
            "address": { "city": "New York" },
            "todos": [{ "id": 1, "title": "Buy food" }]
        }))
    }

    #[test]
    fn view_resolves_nested_paths() {
        let t = tree();
        assert_eq!(view(&t, &path!()), Some(&t));
        assert_eq!(view(&t, &path!("todos.0.title")), Some(&Value::from("Buy food")));
        assert_eq!(view(&t, &path!("todos", "0")), t.get(&path!("todos", 0)));
    }

    #[test]
    fn view_misses_are_none() {
        let t = tree();
        assert_eq!(view(&t, &path!("missing")), None);
        assert_eq!(view(&t, &path!("todos.5")), None);
        assert_eq!(view(&t, &path!("todos.first")), None);
        assert_eq!(view(&t, &path!("address.0")), None);
        assert_eq!(view(&t, &path!("name.length")), None);
    }

    #[test]
    fn assoc_shares_untouched_branches() {
        let t = tree();
        let next = assoc(&t, &path!("address.city"), Value::from("Paris"));

        assert_eq!(view(&next, &path!("address.city")), Some(&Value::from("Paris")));
        assert_eq!(view(&t, &path!("address.city")), Some(&Value::from("New York")));
        assert!(!view(&next, &path!("address"))
            .unwrap()
            .ptr_eq(view(&t, &path!("address")).unwrap()));
        assert!(view(&next, &path!("todos"))
            .unwrap()
            .ptr_eq(view(&t, &path!("todos")).unwrap()));
    }

    #[test]
    fn assoc_root_replaces_whole_value() {
        let t = tree();
        assert_eq!(assoc(&t, &path!(), Value::from(7)), Value::from(7));
    }

    #[test]
    fn assoc_replaces_rather_than_merges() {
        let next = assoc(&tree(), &path!("address"), Value::from(json!({"zip": "10001"})));
        assert_eq!(
            view(&next, &path!("address")),
            Some(&Value::from(json!({"zip": "10001"})))
        );
    }

    #[test]
    fn assoc_creates_missing_intermediates() {
        let next = assoc(&Value::Null, &path!("a.b", 1, "c"), Value::from(true));
        assert_eq!(next, Value::from(json!({"a": {"b": [null, {"c": true}]}})));
    }

    #[test]
    fn assoc_coerces_conflicting_shapes() {
        let t = Value::from(json!({"list": [1, 2], "obj": {"k": 1}, "s": "x"}));

        let keyed = assoc(&t, &path!("list.name"), Value::from("n"));
        assert_eq!(view(&keyed, &path!("list")), Some(&Value::from(json!({"name": "n"}))));

        let indexed = assoc(&t, &path!("obj", 0), Value::from("i"));
        assert_eq!(view(&indexed, &path!("obj")), Some(&Value::from(json!(["i"]))));

        let through_scalar = assoc(&t, &path!("s.deep"), Value::from(1));
        assert_eq!(view(&through_scalar, &path!("s.deep")), Some(&Value::from(1)));
    }

    #[test]
    fn assoc_appends_and_pads_arrays() {
        let t = Value::from(json!([1]));
        assert_eq!(assoc(&t, &path!(1), Value::from(2)), Value::from(json!([1, 2])));
        assert_eq!(
            assoc(&t, &path!(3), Value::from(4)),
            Value::from(json!([1, null, null, 4]))
        );
    }

    #[test]
    fn far_out_index_appends() {
        let t = Value::from(json!({"items": ["a"]}));

        let next = assoc(&t, &path!("items", usize::MAX), Value::from("b"));
        assert_eq!(next, Value::from(json!({"items": ["a", "b"]})));

        let next = assoc(&t, &path!("items.10000000000.name"), Value::from("c"));
        assert_eq!(next, Value::from(json!({"items": ["a", {"name": "c"}]})));

        let edge = assoc(&Value::Null, &path!(MAX_PADDING), Value::from(1));
        assert_eq!(edge.as_array().map(|items| items.len()), Some(MAX_PADDING + 1));
        let past = assoc(&Value::Null, &path!(MAX_PADDING + 1), Value::from(1));
        assert_eq!(past, Value::from(json!([1])));
    }

    #[test]
    fn modify_sees_current_value() {
        let t = Value::from(json!({"n": 41}));
        let next = modify(&t, &path!("n"), |n| {
            Value::from(n.and_then(Value::as_i64).unwrap_or(0) + 1)
        });
        assert_eq!(next, Value::from(json!({"n": 42})));

        let created = modify(&t, &path!("m"), |m| {
            assert!(m.is_none());
            Value::from(0)
        });
        assert_eq!(view(&created, &path!("m")), Some(&Value::from(0)));
    }
}
