//! docschema - A declarative schema and document validation engine
//!
//! Schemas map field names to type/constraint descriptors (scalars, nested
//! schemas, arrays, unions, and resolver functions computed from the data
//! itself). Validation walks a JSON document against the schema, applies
//! defaults in place, and reports every violation in a single error tree.

pub mod document;
pub mod schema;
