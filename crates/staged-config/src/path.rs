//! property paths
//!
//! A property is addressed by a path such as `.properties.syslog.enabled` or
//! `.properties.plans[0].name`. Every path starts with a `.`, segments are separated by `.` and a
//! segment may carry a zero-based row index in brackets. Escaping is not supported.
//!
//! [PathTree] turns a set of paths into an explicit tree so structural questions ("what are the
//! children of this selector?") become lookups instead of string comparisons.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One element of a [PropertyPath]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: String,
    pub index: Option<usize>,
}

impl Segment {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for Segment {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::EmptySegment);
        }

        let Some(open) = s.find('[') else {
            if s.contains(']') {
                return Err(PathError::MalformedIndex(s.to_string()));
            }
            return Ok(Segment::named(s));
        };

        let (name, rest) = s.split_at(open);
        let index = rest
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .filter(|_| !name.is_empty())
            .filter(|digits| is_canonical_index(digits))
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| PathError::MalformedIndex(s.to_string()))?;

        Ok(Segment {
            name: name.to_string(),
            index: Some(index),
        })
    }
}

/// Decimal digits without a leading zero, so each index has exactly one spelling
fn is_canonical_index(digits: &str) -> bool {
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

/// A decomposed property path
///
/// The leading empty segment of the textual form is not stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath(Vec<Segment>);

impl PropertyPath {
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of a field below this one: `.a` -> `.a.field`
    pub fn child(&self, field: &str) -> Self {
        let mut path = self.clone();
        path.0.push(Segment::named(field));
        path
    }

    /// Path of a collection row: `.a.col` -> `.a.col[index]`
    pub fn indexed(&self, index: usize) -> Self {
        let mut path = self.clone();
        if let Some(last) = path.0.last_mut() {
            last.index = Some(index);
        }
        path
    }

    /// The first `len` segments
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0.iter().take(len).cloned().collect())
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        // the 0th item is always empty due to the leading `.`
        if parts.next() != Some("") {
            return Err(PathError::MissingLeadingDelimiter(s.to_string()));
        }

        let segments = parts
            .map(Segment::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.within(s))?;

        if segments.is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self(segments))
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for segment in &self.0 {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<Segment>> for PropertyPath {
    fn from(value: Vec<Segment>) -> Self {
        Self(value)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PathError {
    #[error("path '{0}' must start with '.'")]
    MissingLeadingDelimiter(String),
    #[error("path is empty")]
    Empty,
    #[error("path contains an empty segment")]
    EmptySegment,
    #[error("malformed index in segment '{0}'")]
    MalformedIndex(String),
    #[error("invalid path '{path}': {source}")]
    InPath {
        path: String,
        source: Box<PathError>,
    },
}

impl PathError {
    fn within(self, path: &str) -> Self {
        PathError::InPath {
            path: path.to_string(),
            source: Box::new(self),
        }
    }
}

/// Explicit tree of [Segment]s
///
/// Every node may carry a payload. Children keep their insertion order.
#[derive(Debug)]
pub struct PathTree<T> {
    pub root: indexmap::IndexMap<Segment, Node<T>>,
}

impl<T> Default for PathTree<T> {
    fn default() -> Self {
        Self {
            root: Default::default(),
        }
    }
}

impl<T> PathTree<T> {
    /// Insert a payload
    ///
    /// Returns the previous payload at that path, if any
    pub fn insert(&mut self, path: &PropertyPath, value: T) -> Option<T> {
        tracing::trace!(%path, "insert into path tree");
        self.get_or_insert(path.segments())
            .and_then(|node| node.value.replace(value))
    }

    pub fn get(&self, path: &PropertyPath) -> Option<&T> {
        let (first, rest) = path.segments().split_first()?;
        self.root.get(first)?.get(rest)?.value.as_ref()
    }

    fn get_or_insert(&mut self, key_path: &[Segment]) -> Option<&mut Node<T>> {
        let (key, rest) = key_path.split_first()?;
        let child = self.root.entry(key.clone()).or_default();
        Some(child.get_or_insert(rest))
    }

    /// Number of nodes carrying a payload
    pub fn len(&self) -> usize {
        self.root.values().map(Node::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into `(path, payload)` pairs, parents before children
    pub fn into_entries(self) -> Vec<(PropertyPath, T)> {
        let mut entries = vec![];
        for (segment, node) in self.root {
            node.collect_into(vec![segment], &mut entries);
        }
        entries
    }
}

impl<T> FromIterator<(PropertyPath, T)> for PathTree<T> {
    fn from_iter<I: IntoIterator<Item = (PropertyPath, T)>>(iter: I) -> Self {
        let mut tree = PathTree::default();
        for (path, value) in iter {
            tree.insert(&path, value);
        }
        tree
    }
}

#[derive(Debug)]
pub struct Node<T> {
    pub value: Option<T>,
    pub children: indexmap::IndexMap<Segment, Node<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            value: None,
            children: Default::default(),
        }
    }
}

impl<T> Node<T> {
    fn get(&self, key_path: &[Segment]) -> Option<&Node<T>> {
        match key_path.split_first() {
            None => Some(self),
            Some((key, rest)) => self.children.get(key)?.get(rest),
        }
    }

    fn get_or_insert(&mut self, key_path: &[Segment]) -> &mut Node<T> {
        match key_path.split_first() {
            None => self,
            Some((key, rest)) => self
                .children
                .entry(key.clone())
                .or_default()
                .get_or_insert(rest),
        }
    }

    fn len(&self) -> usize {
        usize::from(self.value.is_some()) + self.children.values().map(Node::len).sum::<usize>()
    }

    fn collect_into(self, path: Vec<Segment>, entries: &mut Vec<(PropertyPath, T)>) {
        if let Some(value) = self.value {
            entries.push((PropertyPath::from(path.clone()), value));
        }

        for (segment, child) in self.children {
            let mut child_path = path.clone();
            child_path.push(segment);
            child.collect_into(child_path, entries);
        }
    }
}
