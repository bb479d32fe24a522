use indexmap::IndexMap;
use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};

use crate::common::{is_embedded, split_path, write_json_string, Value};
use crate::errors::{ErrorKind, MappingError, MappingResult};

/// The generic, store-facing record produced by the writer and consumed by
/// the reader.
///
/// A `Document` is an insertion-ordered map of string keys to [Value]s.
/// Keys containing the field separator (`.`) address embedded documents:
/// `put("a.b", 1)` creates `{"a": {"b": 1}}` and `get("a.b")` walks back down.
/// A numeric segment addresses an element of an array, so `get("tags.0")`
/// returns the first tag.
///
/// Besides the ordinary fields a document carries metadata slots which are
/// never part of the field map: the id, the version, the sequence number and
/// primary term pair, the routing value, the index name and script field
/// values. They are set and read only through their dedicated accessors, so a
/// nested document with an `id` key keeps it as an ordinary field.
///
/// # Examples
///
/// ```ignore
/// let mut doc = Document::new();
/// doc.put("user.name", "Alice")?;
/// doc.set_id("42");
/// assert_eq!(doc.get("user.name"), Some(&Value::from("Alice")));
/// assert_eq!(doc.id(), Some("42"));
/// ```
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Document {
    data: IndexMap<String, Value>,
    id: Option<String>,
    version: Option<i64>,
    seq_no: Option<i64>,
    primary_term: Option<i64>,
    routing: Option<String>,
    index: Option<String>,
    script_fields: IndexMap<String, Vec<Value>>,
}

impl Document {
    /// Creates an empty document with no metadata.
    pub fn new() -> Self {
        Document::default()
    }

    /// Associates the specified [Value] with the specified key.
    ///
    /// If the key contains the field separator the value is stored in an
    /// embedded document, creating intermediate documents as required. An
    /// intermediate value which is not a document is replaced.
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> MappingResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(MappingError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();
        if is_embedded(key) {
            let splits = split_path(key);
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Stores a value under the key as given, without interpreting the field
    /// separator. Used for map entries whose keys may contain dots.
    pub fn insert<T: Into<Value>>(&mut self, key: impl Into<String>, value: T) {
        self.data.insert(key.into(), value.into());
    }

    /// Returns the value for the key, or `None` if the document holds no such
    /// field. A top level key which literally contains a dot wins over the
    /// embedded interpretation.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.data.get(key) {
            Some(value) => Some(value),
            None if is_embedded(key) => {
                let splits = split_path(key);
                let (first, rest) = splits.split_first()?;
                Self::recursive_get(self.data.get(*first), rest)
            }
            None => None,
        }
    }

    /// Returns a mutable reference to a top level field.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Returns `true` if the key, embedded or not, resolves to a field.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes the field for the key and returns it. Removing the last field
    /// of an embedded document leaves the (now empty) embedded document in
    /// place.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if let Some(value) = self.data.shift_remove(key) {
            return Some(value);
        }

        if !is_embedded(key) {
            return None;
        }

        let splits = split_path(key);
        self.deep_remove(&splits)
    }

    /// Merges another document into this one. Embedded documents present on
    /// both sides are merged recursively, every other value is overwritten.
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.data.iter() {
            match (self.data.get_mut(key), value) {
                (Some(Value::Document(existing)), Value::Document(incoming)) => {
                    existing.merge(incoming);
                }
                _ => {
                    self.data.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Copies every top level field of `other` into this document.
    pub fn put_all(&mut self, other: &Document) {
        for (key, value) in other.data.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.data.keys()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // metadata slots

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }

    pub fn set_version(&mut self, version: i64) {
        self.version = Some(version);
    }

    pub fn seq_no(&self) -> Option<i64> {
        self.seq_no
    }

    pub fn primary_term(&self) -> Option<i64> {
        self.primary_term
    }

    /// Returns `true` when both the sequence number and the primary term
    /// are present.
    pub fn has_seq_no_primary_term(&self) -> bool {
        self.seq_no.is_some() && self.primary_term.is_some()
    }

    pub fn set_seq_no_primary_term(&mut self, seq_no: i64, primary_term: i64) {
        self.seq_no = Some(seq_no);
        self.primary_term = Some(primary_term);
    }

    pub fn routing(&self) -> Option<&str> {
        self.routing.as_deref()
    }

    pub fn set_routing(&mut self, routing: impl Into<String>) {
        self.routing = Some(routing.into());
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn set_index(&mut self, index: impl Into<String>) {
        self.index = Some(index.into());
    }

    pub fn script_fields(&self) -> &IndexMap<String, Vec<Value>> {
        &self.script_fields
    }

    pub fn script_field(&self, name: &str) -> Option<&Vec<Value>> {
        self.script_fields.get(name)
    }

    pub fn set_script_field(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.script_fields.insert(name.into(), values);
    }

    /// Renders the ordinary fields as compact JSON. Metadata slots are not
    /// part of the rendering.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push('{');
        for (index, (key, value)) in self.data.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            write_json_string(key, out);
            out.push(':');
            value.write_json(out);
        }
        out.push('}');
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> MappingResult<()> {
        let (key, rest) = match splits.split_first() {
            Some(parts) => parts,
            None => {
                log::error!("Empty embedded key");
                return Err(MappingError::new(
                    "Empty embedded key",
                    ErrorKind::ValidationError,
                ));
            }
        };

        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(MappingError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        if rest.is_empty() {
            self.data.insert(key.to_string(), value);
            return Ok(());
        }

        match self.data.get_mut(*key) {
            Some(Value::Document(nested)) => nested.deep_put(rest, value),
            _ => {
                let mut nested = Document::new();
                nested.deep_put(rest, value)?;
                self.data.insert(key.to_string(), Value::Document(nested));
                Ok(())
            }
        }
    }

    fn deep_remove(&mut self, splits: &[&str]) -> Option<Value> {
        let (key, rest) = splits.split_first()?;
        if rest.is_empty() {
            return self.data.shift_remove(*key);
        }

        match self.data.get_mut(*key) {
            Some(Value::Document(nested)) => nested.deep_remove(rest),
            _ => None,
        }
    }

    fn recursive_get<'a>(value: Option<&'a Value>, splits: &[&str]) -> Option<&'a Value> {
        let value = value?;
        let (key, rest) = match splits.split_first() {
            Some(parts) => parts,
            None => return Some(value),
        };

        match value {
            Value::Document(doc) => Self::recursive_get(doc.data.get(*key), rest),
            Value::Array(items) => {
                // numeric segment addresses an element
                let index = key.parse::<usize>().ok()?;
                Self::recursive_get(items.get(index), rest)
            }
            _ => None,
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .data
            .iter()
            .map(|(k, v)| format!("\"{}\": {}", k, v.to_debug_string()))
            .join(", ");
        write!(f, "{{{}}}", fields)?;
        if let Some(id) = &self.id {
            write!(f, " @id={}", id)?;
        }
        if let Some(version) = self.version {
            write!(f, " @version={}", version)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().collect(),
            ..Document::default()
        }
    }
}

/// Strips the surrounding quotes `stringify!` leaves on string literal keys.
#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] from key value pairs.
///
/// Keys may be identifiers or string literals, values may be expressions,
/// nested `{ ... }` documents or `[ ... ]` arrays. Negative literals must be
/// parenthesized.
///
/// ```ignore
/// let doc = doc! {
///     name: "Alice",
///     "address": { city: "Paris" },
///     scores: [1, 2, (-3)],
/// };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::document::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::document::Document::new();
            $(
                doc.insert($crate::document::normalize(stringify!($key)), $crate::doc_value!($value));
            )*
            doc
        }
    };
}

/// Helper macro converting values for the [doc!] macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
