//! Substitution keys and maps.

use crate::value::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Separator between the segments of a substitution key.
pub const PATH_SEPARATOR: char = '.';

/// A parsed substitution key: a bare name or a dotted attribute path.
///
/// Keys order by path depth first and key text second, which is the order
/// substitutions are applied in: every top-level rebinding happens before
/// any attribute is replaced.
///
/// # Example
///
/// ```
/// use mockable_doctests::namespace::SubstitutionKey;
///
/// let key = SubstitutionKey::parse("object.attribute").unwrap();
/// assert_eq!(key.root(), "object");
/// assert_eq!(key.depth(), 1);
/// assert!(SubstitutionKey::parse("object..attribute").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubstitutionKey {
    raw: String,
    segments: Vec<String>,
}

impl SubstitutionKey {
    /// Parse a key. Returns `None` if any segment is not an identifier.
    pub fn parse(raw: &str) -> Option<Self> {
        let segments: Vec<String> = raw.split(PATH_SEPARATOR).map(str::to_string).collect();
        if !segments.iter().all(|s| is_identifier(s)) {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The key as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The top-level name the key starts from.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// All segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of attribute levels below the root (0 for a bare name).
    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }

    /// Check if the key is a bare top-level name.
    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }
}

impl Ord for SubstitutionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth()
            .cmp(&other.depth())
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for SubstitutionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SubstitutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Check that `s` is a non-empty identifier: a letter or underscore
/// followed by letters, digits, or underscores.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Substitutions declared for one function: key text to replacement value.
///
/// Keys are stored as written and validated when the map is materialized,
/// so a malformed key is reported against the function that declared it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionMap {
    entries: BTreeMap<String, Value>,
}

impl SubstitutionMap {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add a substitution using builder pattern.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Add a substitution, returning the value it replaced if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get the replacement for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of substitutions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no substitutions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys as written, in text order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }

    /// Iterate over the raw entries, in key text order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Copy every entry of `other` into this map; `other` wins on conflict.
    pub fn extend(&mut self, other: SubstitutionMap) {
        self.entries.extend(other.entries);
    }

    /// Parse every key and return the entries in application order.
    ///
    /// Fails with the first key text that does not parse.
    pub fn ordered(&self) -> Result<Vec<(SubstitutionKey, &Value)>, String> {
        let mut ordered = self
            .entries
            .iter()
            .map(|(raw, value)| {
                SubstitutionKey::parse(raw)
                    .map(|key| (key, value))
                    .ok_or_else(|| raw.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;
        ordered.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(ordered)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SubstitutionMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let key = SubstitutionKey::parse("foo").unwrap();
        assert!(key.is_top_level());
        assert_eq!(key.depth(), 0);

        let key = SubstitutionKey::parse("a.b.c").unwrap();
        assert_eq!(key.segments(), &["a", "b", "c"]);
        assert_eq!(key.depth(), 2);
        assert_eq!(key.to_string(), "a.b.c");

        assert!(SubstitutionKey::parse("").is_none());
        assert!(SubstitutionKey::parse(".foo").is_none());
        assert!(SubstitutionKey::parse("foo.").is_none());
        assert!(SubstitutionKey::parse("1foo").is_none());
        assert!(SubstitutionKey::parse("has space").is_none());
        assert!(SubstitutionKey::parse("_private.x1").is_some());
    }

    #[test]
    fn test_ordering_applies_top_level_first() {
        let map = SubstitutionMap::new()
            .with("object.foo", 1)
            .with("zeta", 2)
            .with("alpha", 3)
            .with("a.b.c", 4);

        let order: Vec<String> = map
            .ordered()
            .unwrap()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect();

        assert_eq!(order, vec!["alpha", "zeta", "object.foo", "a.b.c"]);
    }

    #[test]
    fn test_ordered_reports_bad_key() {
        let map = SubstitutionMap::new().with("good", 1).with("bad..key", 2);
        assert_eq!(map.ordered().unwrap_err(), "bad..key");
    }

    #[test]
    fn test_extend_overrides() {
        let mut map = SubstitutionMap::new().with("a", 1).with("b", 2);
        map.extend(SubstitutionMap::new().with("b", 3));

        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        assert_eq!(map.get("b"), Some(&Value::Int(3)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_from_iter() {
        let map: SubstitutionMap = vec![("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(map.keys(), vec!["x", "y"]);
    }
}
