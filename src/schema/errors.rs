//! Schema error types
//!
//! Two distinct classes:
//! - `ConfigError`: the schema itself is misused (bad field name, resolver
//!   returning a non-concrete type). Raised at construction time or mid-walk
//!   and never folded into a document's error tree.
//! - `ValidationError`: the document does not conform. Raised once per
//!   `validate` call, carrying the full error tree.
//!
//! Callers branch on the class to decide whether the schema or the document
//! is at fault.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema misconfiguration, distinct from document validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Field names are identifier-like: letters, digits, underscore.
    #[error("'{0}' is not a valid field name")]
    InvalidFieldName(String),

    /// A type resolver must return a concrete type form.
    #[error("type resolver for '{0}' did not produce a concrete type")]
    UnresolvedType(String),
}

/// A single field's validation outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldError {
    /// Leaf error message
    Message(String),
    /// Error tree of a nested schema field
    Nested(ErrorTree),
    /// Per-element errors of an array field, aligned by index; elements
    /// that passed are `None`
    Items(Vec<Option<FieldError>>),
}

/// Error tree mirroring the document's shape. An empty tree means the
/// document is valid.
///
/// Serializes to a stable JSON shape for downstream consumption: field
/// errors keyed by name, nested trees for nested schema fields,
/// index-aligned sequences for array fields, and a `document` list of
/// cross-field messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorTree {
    /// Per-field errors keyed by field name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldError>,
    /// Document-level (cross-field) error messages
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub document: Vec<String>,
}

impl ErrorTree {
    /// True when no field or document-level errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.document.is_empty()
    }

    /// Looks up one field's error.
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.fields.get(name)
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("<unrenderable error tree>"),
        }
    }
}

/// Document validation failure carrying the full error tree.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("document validation failed: {tree}")]
pub struct ValidationError {
    /// Structured errors mirroring the document shape
    pub tree: ErrorTree,
}

/// Error returned by [`Schema::validate`](super::Schema::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The schema is misconfigured; the document was not at fault
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The document does not conform to the schema
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SchemaError {
    /// Returns the error tree when this is a validation failure.
    pub fn tree(&self) -> Option<&ErrorTree> {
        match self {
            SchemaError::Validation(err) => Some(&err.tree),
            SchemaError::Config(_) => None,
        }
    }

    /// True when the schema, not the document, is at fault.
    pub fn is_config(&self) -> bool {
        matches!(self, SchemaError::Config(_))
    }
}
