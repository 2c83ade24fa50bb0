//! Declarative schema validation subsystem
//!
//! A [`Schema`] maps field names to [`FieldSpec`] constraint descriptors;
//! [`Schema::validate`] walks a JSON document against it.
//!
//! # Design principles
//!
//! - Schemas are immutable after construction and safe to share
//! - Validation walks the schema/document pair once, top down
//! - All violations aggregate into a single error tree per call
//! - Defaults are written into the document as a side effect
//! - Schema misuse is a configuration error, never a tree entry

mod errors;
mod presence;
mod resolve;
mod types;
mod validator;
mod validators;

pub use errors::{
    ConfigError, ErrorTree, FieldError, SchemaError, SchemaResult, ValidationError,
};
pub use presence::{
    mutually_exclusive, requires_all_or_none_of, requires_at_least_one_of,
    requires_exactly_one_of, FieldGroup,
};
pub use types::{
    DefaultValue, DocValidator, FieldSpec, FieldValidator, Schema, TypeResolver, TypeSpec,
};
pub use validators::{length, one_of};
