//! Addresses into a snapshot tree and the normalizer that builds them.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INDEX_SEGMENT: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// One step of an address: a field name or an array index.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Key(_) => None,
            Segment::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A normalized address inside a snapshot.
///
/// The empty path addresses the whole value. Paths are only ever produced
/// already normalized: build them with [`normalize_path`] or [`path!`](crate::path!)
/// rather than by splitting strings by hand.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    pub segments: Vec<Segment>,
}

impl Path {
    /// The empty address.
    pub fn root() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    /// A single field-name segment, taken literally (no dot splitting).
    pub fn key(key: impl Into<String>) -> Self {
        Path {
            segments: vec![Segment::Key(key.into())],
        }
    }

    /// A single index segment.
    pub fn index(index: usize) -> Self {
        Path {
            segments: vec![Segment::Index(index)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, suffix: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(suffix.segments.iter().cloned());
        Path { segments }
    }

    /// The path without its last segment, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Path> {
        if self.is_empty() {
            return None;
        }
        Some(Path {
            segments: self.segments[..self.len() - 1].to_vec(),
        })
    }

    /// Check if this path has the given prefix.
    pub fn has_prefix(&self, prefix: &Path) -> bool {
        prefix.len() <= self.len() && prefix.segments == self.segments[..prefix.len()]
    }

    /// Strip a prefix from this path.
    ///
    /// Returns `None` if the prefix doesn't match.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Path> {
        if self.has_prefix(prefix) {
            Some(Path {
                segments: self.segments[prefix.len()..].to_vec(),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Segment;

    fn index(&self, i: usize) -> &Self::Output {
        &self.segments[i]
    }
}

impl<'p> IntoIterator for &'p Path {
    type Item = &'p Segment;
    type IntoIter = std::slice::Iter<'p, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Path {
            segments: iter.into_iter().collect(),
        }
    }
}

/// A raw, not yet normalized path argument.
///
/// Strings may be dotted (`"users.0.name"`) or numeric (`"3"`); integers are
/// indices. Already-normalized segments and paths pass through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathArg {
    Text(String),
    Index(usize),
    Segments(Vec<Segment>),
}

impl From<&str> for PathArg {
    fn from(s: &str) -> Self {
        PathArg::Text(s.to_string())
    }
}

impl From<String> for PathArg {
    fn from(s: String) -> Self {
        PathArg::Text(s)
    }
}

impl From<&String> for PathArg {
    fn from(s: &String) -> Self {
        PathArg::Text(s.clone())
    }
}

impl From<usize> for PathArg {
    fn from(i: usize) -> Self {
        PathArg::Index(i)
    }
}

impl From<u32> for PathArg {
    fn from(i: u32) -> Self {
        PathArg::Index(i as usize)
    }
}

impl From<i32> for PathArg {
    fn from(i: i32) -> Self {
        PathArg::from(i as i64)
    }
}

impl From<i64> for PathArg {
    // Negative numbers never address an array slot; they fall back to a
    // field named by their decimal text.
    fn from(i: i64) -> Self {
        match usize::try_from(i) {
            Ok(index) => PathArg::Index(index),
            Err(_) => PathArg::Segments(vec![Segment::Key(i.to_string())]),
        }
    }
}

impl From<Segment> for PathArg {
    fn from(segment: Segment) -> Self {
        PathArg::Segments(vec![segment])
    }
}

impl From<Path> for PathArg {
    fn from(path: Path) -> Self {
        PathArg::Segments(path.segments)
    }
}

impl From<&Path> for PathArg {
    fn from(path: &Path) -> Self {
        PathArg::Segments(path.segments.clone())
    }
}

/// Normalize heterogeneous path arguments into a single flat [`Path`].
///
/// Applied left to right, per argument:
/// 1. a string made only of ASCII digits becomes an index;
/// 2. otherwise a string containing `.` is split and each piece normalized;
/// 3. otherwise the string is a field name.
///
/// Total over its input: there is no failure mode.
///
/// ```rust
/// use pathstate_core::{normalize_path, PathArg, Segment};
///
/// let path = normalize_path([PathArg::from("todos"), PathArg::from("0.title")]);
/// assert_eq!(path.segments, vec![
///     Segment::Key("todos".to_string()),
///     Segment::Index(0),
///     Segment::Key("title".to_string()),
/// ]);
/// ```
pub fn normalize_path<I>(args: I) -> Path
where
    I: IntoIterator,
    I::Item: Into<PathArg>,
{
    let mut path = Path::root();
    for arg in args {
        match arg.into() {
            PathArg::Index(index) => path.push(Segment::Index(index)),
            PathArg::Text(text) => normalize_text(&text, &mut path.segments),
            PathArg::Segments(segments) => path.segments.extend(segments),
        }
    }
    path
}

fn normalize_text(text: &str, out: &mut Vec<Segment>) {
    if INDEX_SEGMENT.is_match(text) {
        // Digit runs too long for usize stay field names.
        if let Ok(index) = text.parse::<usize>() {
            out.push(Segment::Index(index));
            return;
        }
    }

    if text.contains('.') {
        for piece in text.split('.') {
            normalize_text(piece, out);
        }
        return;
    }

    out.push(Segment::Key(text.to_string()));
}

/// Build a normalized [`Path`] from any mix of strings, dotted strings,
/// integers, segments and paths.
///
/// # Example
///
/// ```rust
/// use pathstate_core::path;
///
/// assert_eq!(path!("users.0.name"), path!("users", 0, "name"));
/// assert_eq!(path!("users", "0.name"), path!("users", 0, "name"));
/// assert!(path!().is_empty());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::normalize_path([$($crate::PathArg::from($arg)),+])
    };
}
