//! Document wrapper with key-checked, recursively wrapped access
//!
//! [`Document`] wraps a JSON mapping: keys are validated against the same
//! identifier rule schemas use for field names, nested mappings become
//! documents of their own, and sequences wrap their elements, recursively.
//! Indexing follows the `serde_json` convention of returning null for
//! missing entries instead of panicking.
//!
//! The wrapper is a convenience for consumers holding raw mapping data and
//! is fully independent of the validation engine.

use std::collections::BTreeMap;
use std::ops::Index;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Keys are identifier-like: letters, digits, underscore.
static KEY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document construction and access errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Keys must be identifier-like: letters, digits, underscore.
    #[error("'{0}' is not a valid document key")]
    InvalidKey(String),

    /// Only mappings can be wrapped at the top level.
    #[error("document root must be a mapping")]
    NotAMapping,
}

/// One wrapped value: nested mappings become documents, sequences wrap
/// their elements, scalars pass through.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A nested mapping, wrapped
    Document(Document),
    /// A sequence of wrapped elements
    List(Vec<Node>),
    /// A scalar (string, number, bool, or null)
    Scalar(Value),
}

static NULL_NODE: Node = Node::Scalar(Value::Null);

impl Node {
    fn wrap(value: Value) -> DocumentResult<Node> {
        match value {
            Value::Object(map) => Ok(Node::Document(Document::from_map(map)?)),
            Value::Array(items) => Ok(Node::List(
                items
                    .into_iter()
                    .map(Node::wrap)
                    .collect::<DocumentResult<_>>()?,
            )),
            scalar => Ok(Node::Scalar(scalar)),
        }
    }

    /// Unwraps back into a plain JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Document(document) => document.to_value(),
            Node::List(items) => Value::Array(items.iter().map(Node::to_value).collect()),
            Node::Scalar(value) => value.clone(),
        }
    }

    /// The nested document, when this node wraps a mapping.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Node::Document(document) => Some(document),
            _ => None,
        }
    }

    /// The wrapped elements, when this node wraps a sequence.
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// The scalar value, when this node wraps one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Node::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The string slice, when this node wraps a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    /// True when this node wraps an explicit or missing null.
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Value::Null))
    }
}

/// Keyed access into a nested document; null for anything else.
impl Index<&str> for Node {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        match self {
            Node::Document(document) => &document[key],
            _ => &NULL_NODE,
        }
    }
}

/// Positional access into a wrapped sequence; null for anything else.
impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        match self {
            Node::List(items) => items.get(index).unwrap_or(&NULL_NODE),
            _ => &NULL_NODE,
        }
    }
}

/// A mapping wrapper with identifier-checked keys and recursive wrapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: BTreeMap<String, Node>,
}

impl Document {
    /// Wraps a JSON object, recursively wrapping nested mappings and
    /// sequences.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InvalidKey` if any key at any depth is not
    /// identifier-like, or `DocumentError::NotAMapping` for a non-object
    /// root.
    pub fn new(value: Value) -> DocumentResult<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(DocumentError::NotAMapping),
        }
    }

    /// Wraps a JSON object map directly.
    pub fn from_map(map: Map<String, Value>) -> DocumentResult<Self> {
        let mut entries = BTreeMap::new();
        for (key, value) in map {
            if !KEY_NAME.is_match(&key) {
                return Err(DocumentError::InvalidKey(key));
            }
            entries.insert(key, Node::wrap(value)?);
        }
        Ok(Self { entries })
    }

    /// Looks up a top-level entry.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Mutable lookup of a top-level entry.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Sets a top-level entry, wrapping the value.
    ///
    /// # Errors
    ///
    /// The key and any nested keys inside the value are validated the same
    /// way as at construction.
    pub fn set(&mut self, key: &str, value: Value) -> DocumentResult<()> {
        if !KEY_NAME.is_match(key) {
            return Err(DocumentError::InvalidKey(key.to_string()));
        }
        self.entries.insert(key.to_string(), Node::wrap(value)?);
        Ok(())
    }

    /// True when `key` has an entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the top-level keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Unwraps into a plain JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_value()))
                .collect(),
        )
    }
}

/// Keyed access; null for missing entries.
impl Index<&str> for Document {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        self.entries.get(key).unwrap_or(&NULL_NODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        Document::new(json!({
            "author": "John Humphreys",
            "content": {
                "title": "How to make cookies",
                "text": "First start by pre-heating the oven..."
            },
            "category": "cooking",
            "comments": [
                {"commenter": "Julio Cesar", "comment": "Great post dude!"},
                {"commenter": "Michael Andrews", "comment": "My wife loves these."}
            ],
            "tags": ["recipe", "cookies"]
        }))
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_key_names() {
        let result = Document::new(json!({"contains space": 34}));
        assert!(matches!(result, Err(DocumentError::InvalidKey(key)) if key == "contains space"));
    }

    #[test]
    fn test_rejects_invalid_nested_keys() {
        let result = Document::new(json!({"outer": {"bad.key": 1}}));
        assert!(matches!(result, Err(DocumentError::InvalidKey(_))));
    }

    #[test]
    fn test_rejects_non_mapping_root() {
        assert_eq!(
            Document::new(json!([1, 2])),
            Err(DocumentError::NotAMapping)
        );
    }

    #[test]
    fn test_wraps_nested_tree() {
        let document = sample();
        assert!(document["content"].as_document().is_some());
        assert!(document["comments"][0].as_document().is_some());
        assert!(document["tags"].as_list().is_some());
    }

    #[test]
    fn test_keyed_access() {
        let document = sample();
        assert_eq!(document["category"].as_str(), Some("cooking"));
        assert_eq!(
            document["comments"][0]["commenter"].as_str(),
            Some("Julio Cesar")
        );
    }

    #[test]
    fn test_missing_entries_read_as_null() {
        let document = sample();
        assert!(document["nonexistent"].is_null());
        assert!(document["comments"][99].is_null());
        assert!(document["category"]["not_a_document"].is_null());
    }

    #[test]
    fn test_set_and_read_back() {
        let mut document = sample();
        document.set("category", json!("baking")).unwrap();
        assert_eq!(document["category"].as_str(), Some("baking"));
    }

    #[test]
    fn test_set_validates_key() {
        let mut document = sample();
        assert!(document.set("bad key", json!(1)).is_err());
    }

    #[test]
    fn test_round_trips_to_value() {
        let value = json!({
            "category": "cooking",
            "tags": ["recipe", "cookies"],
            "content": {"title": "t"}
        });
        let document = Document::new(value.clone()).unwrap();
        assert_eq!(document.to_value(), value);
    }
}
