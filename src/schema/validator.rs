//! Document validation engine
//!
//! Recursive descent over the schema/document pair:
//! - undeclared keys are rejected, collected without stopping other checks
//! - every declared field runs the full field check: default application,
//!   type resolution, null policy, type check, attached validators
//! - field validators fail fast per field; document-level validators and
//!   unknown-key checks accumulate every failure
//! - all violations aggregate into a single error tree per call
//! - defaults are written into the document even when validation fails

use chrono::DateTime;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::errors::{ConfigError, ErrorTree, FieldError, SchemaResult, ValidationError};
use super::resolve::resolve;
use super::types::{FieldSpec, Schema, TypeSpec};

impl Schema {
    /// Validates `document` against this schema.
    ///
    /// Absent fields with a default get the default written into the
    /// document; that side effect applies regardless of whether validation
    /// succeeds. A document that validated once revalidates cleanly, since
    /// its defaults are already present.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Validation` carrying the full error tree when
    /// the document does not conform, or `SchemaError::Config` when the
    /// schema itself is misconfigured (a resolver produced a non-concrete
    /// type).
    pub fn validate(&self, document: &mut Value) -> SchemaResult<()> {
        let map = match document.as_object_mut() {
            Some(map) => map,
            None => {
                let tree = ErrorTree {
                    document: vec!["document must be an object".to_string()],
                    ..Default::default()
                };
                return Err(ValidationError { tree }.into());
            }
        };

        let tree = validate_map(self, map)?;
        if tree.is_empty() {
            debug!(fields = self.fields.len(), "document accepted");
            Ok(())
        } else {
            debug!(
                field_errors = tree.fields.len(),
                document_errors = tree.document.len(),
                "document rejected"
            );
            Err(ValidationError { tree }.into())
        }
    }
}

/// Validates one mapping level against a schema, collecting errors into a
/// tree. Nested schema fields re-enter here through `check_type`.
fn validate_map(
    schema: &Schema,
    document: &mut Map<String, Value>,
) -> Result<ErrorTree, ConfigError> {
    let mut tree = ErrorTree::default();

    for key in document.keys() {
        if !schema.fields.contains_key(key) {
            tree.fields.insert(
                key.clone(),
                FieldError::Message(format!("{} is not an allowed field", key)),
            );
        }
    }

    for (name, spec) in &schema.fields {
        if let Some(error) = validate_field(name, spec, document)? {
            tree.fields.insert(name.clone(), error);
        }
    }

    for validator in &schema.validates {
        if let Some(message) = validator(document) {
            tree.document.push(message);
        }
    }

    Ok(tree)
}

/// Validates a single field inside its container, writing defaults into the
/// container as a side effect.
fn validate_field(
    name: &str,
    spec: &FieldSpec,
    document: &mut Map<String, Value>,
) -> Result<Option<FieldError>, ConfigError> {
    let mut value = match document.get(name) {
        Some(value) => value.clone(),
        None => match &spec.default {
            Some(default) => {
                trace!(field = name, "applying default");
                default.produce()
            }
            None if spec.required => {
                return Ok(Some(FieldError::Message(format!("{} is required", name))));
            }
            None => return Ok(None),
        },
    };

    let error = check_value(name, spec, &mut value)?;

    // Defaults stick, including those applied inside nested values, even
    // when this or any other field fails.
    document.insert(name.to_string(), value);

    Ok(error)
}

/// Runs the per-value pipeline: type resolution, null policy, type check,
/// attached validators.
fn check_value(
    name: &str,
    spec: &FieldSpec,
    value: &mut Value,
) -> Result<Option<FieldError>, ConfigError> {
    let resolved = resolve(&spec.field_type, value, name)?;

    if value.is_null() {
        if spec.is_nullable() {
            return Ok(None);
        }
        return Ok(Some(FieldError::Message(format!(
            "{} may not be null and is not set",
            name
        ))));
    }

    if let Some(error) = check_type(name, &resolved, value)? {
        return Ok(Some(error));
    }

    for validator in &spec.validates {
        if let Some(message) = validator(value) {
            return Ok(Some(FieldError::Message(message)));
        }
    }

    Ok(None)
}

/// Checks a non-null value against a resolved concrete type.
fn check_type(
    name: &str,
    expected: &TypeSpec,
    value: &mut Value,
) -> Result<Option<FieldError>, ConfigError> {
    match expected {
        TypeSpec::String | TypeSpec::Int | TypeSpec::Float | TypeSpec::Bool
        | TypeSpec::DateTime => {
            if scalar_matches(expected, value) {
                Ok(None)
            } else {
                Ok(Some(type_error(name, expected.type_name())))
            }
        }
        TypeSpec::Object(schema) => {
            let map = match value.as_object_mut() {
                Some(map) => map,
                None => return Ok(Some(type_error(name, "object"))),
            };
            let tree = validate_map(schema, map)?;
            if tree.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldError::Nested(tree)))
            }
        }
        TypeSpec::Array(element_type) => {
            let items = match value.as_array_mut() {
                Some(items) => items,
                None => return Ok(Some(type_error(name, "array"))),
            };
            let mut errors = Vec::with_capacity(items.len());
            let mut failed = false;
            for item in items.iter_mut() {
                let error = check_element(name, element_type, item)?;
                failed |= error.is_some();
                errors.push(error);
            }
            if failed {
                Ok(Some(FieldError::Items(errors)))
            } else {
                Ok(None)
            }
        }
        TypeSpec::Mixed(members) => {
            for member in members {
                if conforms(name, member, value)? {
                    return Ok(None);
                }
            }
            let names: Vec<&str> = members.iter().map(TypeSpec::type_name).collect();
            Ok(Some(FieldError::Message(format!(
                "{} must be of type(s) {}",
                name,
                names.join(", ")
            ))))
        }
        TypeSpec::Resolver(_) => Err(ConfigError::UnresolvedType(name.to_string())),
    }
}

/// Checks one array element under synthetic single-field rules: the element
/// type may itself be a resolver, resolved per element, and a null element
/// passes (a bare element spec is optional, hence nullable).
fn check_element(
    name: &str,
    element_type: &TypeSpec,
    value: &mut Value,
) -> Result<Option<FieldError>, ConfigError> {
    let resolved = resolve(element_type, value, name)?;
    if value.is_null() {
        return Ok(None);
    }
    check_type(name, &resolved, value)
}

/// Union membership test, tried member by member with the first match
/// short-circuiting. Inner failures stay silent: a failed member attempt
/// just means "try the next one". A matching schema or array member commits
/// its defaults into the value; a failed attempt must not leak them.
fn conforms(name: &str, member: &TypeSpec, value: &mut Value) -> Result<bool, ConfigError> {
    match member {
        TypeSpec::String | TypeSpec::Int | TypeSpec::Float | TypeSpec::Bool
        | TypeSpec::DateTime => Ok(scalar_matches_exact(member, value)),
        TypeSpec::Object(schema) => {
            let map = match value.as_object() {
                Some(map) => map,
                None => return Ok(false),
            };
            let mut scratch = map.clone();
            if validate_map(schema, &mut scratch)?.is_empty() {
                *value = Value::Object(scratch);
                Ok(true)
            } else {
                Ok(false)
            }
        }
        TypeSpec::Array(element_type) => {
            let items = match value.as_array() {
                Some(items) => items,
                None => return Ok(false),
            };
            let mut scratch = items.clone();
            for item in scratch.iter_mut() {
                if check_element(name, element_type, item)?.is_some() {
                    return Ok(false);
                }
            }
            *value = Value::Array(scratch);
            Ok(true)
        }
        TypeSpec::Mixed(inner) => {
            for member in inner {
                if conforms(name, member, value)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        TypeSpec::Resolver(_) => Err(ConfigError::UnresolvedType(name.to_string())),
    }
}

/// Scalar instance check with the single widening rule: an integer is
/// accepted where a float is declared, never the reverse.
fn scalar_matches(expected: &TypeSpec, value: &Value) -> bool {
    match expected {
        TypeSpec::String => value.is_string(),
        TypeSpec::Int => value.is_i64() || value.is_u64(),
        TypeSpec::Float => value.is_number(),
        TypeSpec::Bool => value.is_boolean(),
        TypeSpec::DateTime => match value.as_str() {
            Some(text) => DateTime::parse_from_rfc3339(text).is_ok(),
            None => false,
        },
        _ => false,
    }
}

/// Exact scalar identity used inside mixed unions: no widening.
fn scalar_matches_exact(expected: &TypeSpec, value: &Value) -> bool {
    match expected {
        TypeSpec::Float => value.is_f64(),
        other => scalar_matches(other, value),
    }
}

fn type_error(name: &str, type_name: &str) -> FieldError {
    FieldError::Message(format!("{} must be of type {}", name, type_name))
}
