//! Field-level validator factories
//!
//! Factories produce closures attached to a field via
//! [`FieldSpec::validate`](super::FieldSpec::validate). They run after type
//! checking, in declaration order; the first failing message becomes the
//! field's error.

use serde_json::Value;

/// The value must equal one of the given choices.
pub fn one_of<I, V>(choices: I) -> impl Fn(&Value) -> Option<String> + Send + Sync + 'static
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let choices: Vec<Value> = choices.into_iter().map(Into::into).collect();
    move |value| {
        if choices.contains(value) {
            None
        } else {
            Some(format!("{} is not a valid choice", value))
        }
    }
}

/// The value's length (string characters or array elements) must be at
/// least `min` and, when given, at most `max`.
pub fn length(
    min: usize,
    max: Option<usize>,
) -> impl Fn(&Value) -> Option<String> + Send + Sync + 'static {
    move |value| {
        let len = match value {
            Value::String(text) => text.chars().count(),
            Value::Array(items) => items.len(),
            other => return Some(format!("{} does not have a length", other)),
        };
        if len < min {
            return Some(format!("{} must have a length of at least {}", value, min));
        }
        if let Some(max) = max {
            if len > max {
                return Some(format!("{} must have a length of at most {}", value, max));
            }
        }
        None
    }
}
