//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit integer
//! - float: 64-bit floating point (accepts integer values)
//! - bool: Boolean
//! - datetime: RFC 3339 timestamp string
//! - object: nested schema
//! - array: homogeneous sequence with an element type
//! - mixed: union of member types, first match wins
//! - resolver: type computed from the value under validation

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::errors::ConfigError;

/// Field names are identifier-like: letters, digits, underscore.
static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Returns true if `name` is an acceptable field name.
pub(crate) fn valid_field_name(name: &str) -> bool {
    FIELD_NAME.is_match(name)
}

/// Computes a concrete type from the value under validation.
///
/// Invoked fresh for every validated value, never memoized. Must return a
/// concrete form (anything but another resolver). The author is responsible
/// for termination: a resolver that returns a schema reaching the same
/// resolver without consuming the value will recurse forever.
pub type TypeResolver = Arc<dyn Fn(&Value) -> TypeSpec + Send + Sync>;

/// Checks one field value, returning an error message on failure.
pub type FieldValidator = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Cross-field check over a whole document, returning a message on failure.
pub type DocValidator = Arc<dyn Fn(&Map<String, Value>) -> Option<String> + Send + Sync>;

/// Field type descriptor.
#[derive(Clone)]
pub enum TypeSpec {
    /// UTF-8 string
    String,
    /// 64-bit integer
    Int,
    /// 64-bit floating point; integer values are accepted
    Float,
    /// Boolean
    Bool,
    /// String holding an RFC 3339 timestamp
    DateTime,
    /// Nested document validated against its own schema
    Object(Schema),
    /// Homogeneous array; the element type may be any form including a resolver
    Array(Box<TypeSpec>),
    /// Union of member types, tried in declared order
    Mixed(Vec<TypeSpec>),
    /// Type computed per document from the value under validation
    Resolver(TypeResolver),
}

impl TypeSpec {
    /// Array-of shorthand.
    pub fn array(element: TypeSpec) -> Self {
        TypeSpec::Array(Box::new(element))
    }

    /// Union-of shorthand.
    pub fn mixed(members: impl IntoIterator<Item = TypeSpec>) -> Self {
        TypeSpec::Mixed(members.into_iter().collect())
    }

    /// Wraps a resolver function.
    pub fn resolver(f: impl Fn(&Value) -> TypeSpec + Send + Sync + 'static) -> Self {
        TypeSpec::Resolver(Arc::new(f))
    }

    /// Returns the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeSpec::String => "string",
            TypeSpec::Int => "int",
            TypeSpec::Float => "float",
            TypeSpec::Bool => "bool",
            TypeSpec::DateTime => "datetime",
            TypeSpec::Object(_) => "object",
            TypeSpec::Array(_) => "array",
            TypeSpec::Mixed(_) => "mixed",
            TypeSpec::Resolver(_) => "resolver",
        }
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Object(schema) => f.debug_tuple("Object").field(schema).finish(),
            TypeSpec::Array(element) => f.debug_tuple("Array").field(element).finish(),
            TypeSpec::Mixed(members) => f.debug_tuple("Mixed").field(members).finish(),
            TypeSpec::Resolver(_) => f.write_str("Resolver(..)"),
            scalar => f.write_str(scalar.type_name()),
        }
    }
}

impl From<Schema> for TypeSpec {
    fn from(schema: Schema) -> Self {
        TypeSpec::Object(schema)
    }
}

/// Default applied when a field is absent from the document.
#[derive(Clone)]
pub enum DefaultValue {
    /// Literal value, cloned into the document
    Literal(Value),
    /// Zero-argument function producing the value
    Computed(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produces the default value.
    pub(crate) fn produce(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Computed(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A single field's type and constraints.
#[derive(Clone)]
pub struct FieldSpec {
    pub(crate) field_type: TypeSpec,
    pub(crate) required: bool,
    pub(crate) nullable: Option<bool>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) validates: Vec<FieldValidator>,
}

impl FieldSpec {
    /// A field whose key must be present in the document.
    pub fn required(field_type: impl Into<TypeSpec>) -> Self {
        Self {
            field_type: field_type.into(),
            required: true,
            nullable: None,
            default: None,
            validates: Vec::new(),
        }
    }

    /// A field that may be omitted.
    pub fn optional(field_type: impl Into<TypeSpec>) -> Self {
        Self {
            field_type: field_type.into(),
            required: false,
            nullable: None,
            default: None,
            validates: Vec::new(),
        }
    }

    /// Overrides the nullable policy.
    ///
    /// Unset, the policy follows `required`: optional fields accept an
    /// explicit null, required fields do not.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Literal default, written into the document when the field is absent.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Computed default, invoked when the field is absent.
    pub fn default_with(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::Computed(Arc::new(f)));
        self
    }

    /// Attaches a validator, run after type checking.
    ///
    /// Validators run in declaration order; the first failing message
    /// becomes the field's error and halts the rest.
    pub fn validate(
        mut self,
        validator: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.validates.push(Arc::new(validator));
        self
    }

    /// Effective nullable policy.
    pub(crate) fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(!self.required)
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("nullable", &self.nullable)
            .field("default", &self.default)
            .field("validates", &self.validates.len())
            .finish()
    }
}

/// A declarative document schema: field constraints plus document-level
/// validators.
///
/// Immutable after construction apart from validator composition via
/// [`Schema::validate_with`]. Validation never mutates the schema, only the
/// document passed in, so one schema is safe to share and reuse across
/// threads.
///
/// Nested schemas are owned by value, so a schema can never statically
/// reference itself; recursive shapes are only reachable through
/// [`TypeSpec::Resolver`].
#[derive(Clone)]
pub struct Schema {
    pub(crate) fields: BTreeMap<String, FieldSpec>,
    pub(crate) validates: Vec<DocValidator>,
}

impl Schema {
    /// Creates a schema from field constraints.
    ///
    /// Fields are kept sorted by name so error trees come out deterministic.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFieldName` if any field name is not
    /// identifier-like (letters, digits, underscore; no spaces or dots).
    pub fn new<K, I>(fields: I) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldSpec)>,
    {
        let mut map = BTreeMap::new();
        for (name, spec) in fields {
            let name = name.into();
            if !valid_field_name(&name) {
                return Err(ConfigError::InvalidFieldName(name));
            }
            map.insert(name, spec);
        }
        Ok(Self {
            fields: map,
            validates: Vec::new(),
        })
    }

    /// Creates a schema with document-level validators supplied up front.
    ///
    /// Equivalent to [`Schema::new`] followed by
    /// [`Schema::validate_with`] for each validator, in order.
    ///
    /// # Errors
    ///
    /// Field names are checked the same way as in [`Schema::new`].
    pub fn with_validators<K, I>(
        fields: I,
        validates: Vec<DocValidator>,
    ) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldSpec)>,
    {
        let mut schema = Self::new(fields)?;
        schema.validates = validates;
        Ok(schema)
    }

    /// Appends a document-level validator, run after all field checks.
    ///
    /// Unlike field validators, every document-level failure is collected.
    pub fn validate_with(
        mut self,
        validator: impl Fn(&Map<String, Value>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.validates.push(Arc::new(validator));
        self
    }

    /// Returns the declared field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields)
            .field("validates", &self.validates.len())
            .finish()
    }
}
