//! Type descriptor resolution
//!
//! A field's declared type may be a resolver: a function computing the
//! concrete type from the value under validation. Resolution happens fresh
//! for every validated value and is never memoized, since the resolved type
//! may depend on data inside the value (a sub-document carrying a
//! `first_name` key validates against a different schema than one without).

use serde_json::Value;

use super::errors::ConfigError;
use super::types::TypeSpec;

/// Resolves a type descriptor against the value under validation.
///
/// Concrete forms pass through unchanged. A resolver is invoked with the
/// candidate value and must itself return a concrete form.
///
/// # Errors
///
/// Returns `ConfigError::UnresolvedType` when the resolver hands back
/// another resolver; that is schema misconfiguration, not a document
/// validation failure.
pub(crate) fn resolve(
    spec: &TypeSpec,
    value: &Value,
    field: &str,
) -> Result<TypeSpec, ConfigError> {
    match spec {
        TypeSpec::Resolver(resolver) => {
            let resolved = resolver(value);
            if matches!(resolved, TypeSpec::Resolver(_)) {
                return Err(ConfigError::UnresolvedType(field.to_string()));
            }
            Ok(resolved)
        }
        concrete => Ok(concrete.clone()),
    }
}
