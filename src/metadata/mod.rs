//! Opaque per-repository metadata records
//!
//! A [`MetadataRecord`] is an associative structure of string keys to
//! scalars, lists, or nested records, owned by whichever store supplied
//! it. The core only reads it: dot-separated field paths are resolved by
//! descending the nesting one segment at a time, falling back to the
//! closest-matching key when an exact one is absent.

use serde_json::{Map, Value};

use crate::search::fuzzy;

/// Minimum similarity for a fuzzy key to stand in for a missing segment.
///
/// Deliberately independent of the caller-supplied evaluation threshold:
/// field names are short and stable, so the bar stays fixed.
const KEY_MATCH_THRESHOLD: u32 = 70;

/// Read-only metadata for one repository
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataRecord(Map<String, Value>);

impl MetadataRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Number of top-level fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the record has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a top-level field by exact key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a dot-separated field path against the record
    ///
    /// At each level the exact key is tried first; if absent, the key
    /// with the highest similarity to the segment is accepted when it
    /// scores at least 70. Returns `None` when no key qualifies or the
    /// descent hits a non-object value before the path is exhausted.
    ///
    /// # Examples
    /// ```
    /// # use reposcope::metadata::MetadataRecord;
    /// # use serde_json::json;
    /// let record = MetadataRecord::from(json!({
    ///     "remote": { "stars": 42 }
    /// }));
    /// assert_eq!(record.resolve("remote.stars"), Some(&json!(42)));
    /// assert_eq!(record.resolve("remote.strs"), Some(&json!(42)));
    /// assert_eq!(record.resolve("missing.field"), None);
    /// ```
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = lookup(&self.0, first)?;

        for segment in segments {
            let Value::Object(map) = current else {
                return None;
            };
            current = lookup(map, segment)?;
        }

        Some(current)
    }

    /// Collect every key and scalar leaf as searchable text
    ///
    /// Keys at every nesting level are included, as are string, numeric
    /// and boolean leaves inside lists and nested records. Null leaves
    /// carry no text and are skipped.
    #[must_use]
    pub fn text_fragments(&self) -> Vec<String> {
        let mut fragments = Vec::new();
        for (key, value) in &self.0 {
            fragments.push(key.clone());
            collect_text(value, &mut fragments);
        }
        fragments
    }

    /// Iterate over the top-level fields
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for MetadataRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for MetadataRecord {
    /// Wrap a JSON value; non-object values become an empty record
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }
}

/// Canonical string form of a scalar value
///
/// Strings pass through unquoted, numbers and booleans use their display
/// form, null and containers have none.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, segment: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(segment) {
        return Some(value);
    }

    let (best_key, best_score) = map
        .keys()
        .map(|key| (key, fuzzy::similarity(key, segment)))
        .max_by_key(|(_, score)| *score)?;

    if best_score >= KEY_MATCH_THRESHOLD {
        map.get(best_key)
    } else {
        None
    }
}

fn collect_text(value: &Value, fragments: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                fragments.push(key.clone());
                collect_text(nested, fragments);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, fragments);
            }
        }
        _ => {
            if let Some(text) = scalar_text(value) {
                fragments.push(text);
            }
        }
    }
}
