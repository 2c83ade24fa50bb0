//! Document-level presence rules
//!
//! Factories produce cross-field validators attached via
//! [`Schema::validate_with`](super::Schema::validate_with). A requirement
//! names either a single field or a group of fields; a group counts as
//! presented only when every member maps to a non-null value.

use std::fmt;

use serde_json::{Map, Value};

/// A single field or an all-or-nothing group of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldGroup {
    /// One field, presented when its key holds a non-null value
    One(String),
    /// A group, presented only when every member holds a non-null value
    All(Vec<String>),
}

impl FieldGroup {
    /// True when this field or group is presented in `document`.
    fn presented(&self, document: &Map<String, Value>) -> bool {
        match self {
            FieldGroup::One(name) => is_set(document, name),
            FieldGroup::All(names) => names.iter().all(|name| is_set(document, name)),
        }
    }
}

fn is_set(document: &Map<String, Value>, name: &str) -> bool {
    match document.get(name) {
        Some(value) => !value.is_null(),
        None => false,
    }
}

impl From<&str> for FieldGroup {
    fn from(name: &str) -> Self {
        FieldGroup::One(name.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for FieldGroup {
    fn from(names: [&str; N]) -> Self {
        FieldGroup::All(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<Vec<&str>> for FieldGroup {
    fn from(names: Vec<&str>) -> Self {
        FieldGroup::All(names.iter().map(|name| name.to_string()).collect())
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldGroup::One(name) => f.write_str(name),
            FieldGroup::All(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

fn render(fields: &[FieldGroup]) -> String {
    fields
        .iter()
        .map(FieldGroup::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn count_presented(fields: &[FieldGroup], document: &Map<String, Value>) -> usize {
    fields
        .iter()
        .filter(|field| field.presented(document))
        .count()
}

/// At least one of the given fields or groups must be presented.
pub fn requires_at_least_one_of(
    fields: Vec<FieldGroup>,
) -> impl Fn(&Map<String, Value>) -> Option<String> + Send + Sync + 'static {
    move |document| {
        if fields.iter().any(|field| field.presented(document)) {
            None
        } else {
            Some(format!("One of {} is required", render(&fields)))
        }
    }
}

/// Exactly one of the given fields or groups must be presented.
pub fn requires_exactly_one_of(
    fields: Vec<FieldGroup>,
) -> impl Fn(&Map<String, Value>) -> Option<String> + Send + Sync + 'static {
    move |document| {
        if count_presented(&fields, document) == 1 {
            None
        } else {
            Some(format!("Exactly one of {} is required", render(&fields)))
        }
    }
}

/// All of the given fields must be presented, or none of them.
pub fn requires_all_or_none_of<I, S>(
    fields: I,
) -> impl Fn(&Map<String, Value>) -> Option<String> + Send + Sync + 'static
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    move |document| {
        let presented = fields.iter().filter(|name| is_set(document, name)).count();
        if presented == 0 || presented == fields.len() {
            None
        } else {
            Some(format!("All or none of {} is required", fields.join(", ")))
        }
    }
}

/// At most one of the given fields or groups may be presented.
pub fn mutually_exclusive(
    fields: Vec<FieldGroup>,
) -> impl Fn(&Map<String, Value>) -> Option<String> + Send + Sync + 'static {
    move |document| {
        if count_presented(&fields, document) <= 1 {
            None
        } else {
            Some(format!("Mutually Exclusive of {} is required", render(&fields)))
        }
    }
}
