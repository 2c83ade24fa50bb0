//! Shared fixture schemas and documents for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use docschema::schema::{length, one_of, DocValidator, FieldSpec, Schema, TypeSpec};
use serde_json::{json, Map, Value};

/// Fixed timestamp used as a computed default so tests stay deterministic.
pub fn stubnow() -> Value {
    Value::String(
        Utc.with_ymd_and_hms(2012, 4, 5, 0, 0, 0)
            .unwrap()
            .to_rfc3339(),
    )
}

pub fn name_schema() -> Schema {
    Schema::new([
        ("first", FieldSpec::required(TypeSpec::String)),
        ("last", FieldSpec::required(TypeSpec::String)),
    ])
    .unwrap()
}

pub fn about_schema() -> Schema {
    Schema::new([
        ("first_name", FieldSpec::required(TypeSpec::String)),
        ("last_name", FieldSpec::required(TypeSpec::String)),
        ("birth_year", FieldSpec::required(TypeSpec::Int)),
        ("birth_month", FieldSpec::required(TypeSpec::Int)),
        ("birth_day", FieldSpec::required(TypeSpec::Int)),
    ])
    .unwrap()
}

pub fn website_schema() -> Schema {
    Schema::new([
        ("url", FieldSpec::required(TypeSpec::String)),
        ("name", FieldSpec::required(TypeSpec::String)),
    ])
    .unwrap()
}

pub fn comment_schema() -> Schema {
    Schema::new([
        ("commenter", FieldSpec::required(name_schema())),
        ("email", FieldSpec::optional(TypeSpec::String)),
        ("comment", FieldSpec::required(TypeSpec::String)),
        ("votes", FieldSpec::optional(TypeSpec::Int).default_value(0)),
    ])
    .unwrap()
}

/// Authors come in two shapes; the presence of `first_name` picks the
/// schema the value validates against.
pub fn author_type(value: &Value) -> TypeSpec {
    if value.get("first_name").is_some() {
        TypeSpec::Object(about_schema())
    } else {
        TypeSpec::Object(name_schema())
    }
}

/// Websites may be a bare URL string, one site mapping, or a list of them.
pub fn website_type(value: &Value) -> TypeSpec {
    if value.is_array() {
        TypeSpec::array(TypeSpec::Object(website_schema()))
    } else if value.is_object() {
        TypeSpec::Object(website_schema())
    } else {
        TypeSpec::String
    }
}

/// Editors are either full name mappings or plain name strings.
pub fn editor_type(value: &Value) -> TypeSpec {
    if value.is_object() {
        TypeSpec::Object(name_schema())
    } else {
        TypeSpec::String
    }
}

fn parse_date(document: &Map<String, Value>, field: &str) -> Option<DateTime<FixedOffset>> {
    document
        .get(field)?
        .as_str()
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
}

pub fn mod_date_gt_creation_date(
) -> impl Fn(&Map<String, Value>) -> Option<String> + Send + Sync + 'static {
    |document| {
        let modification = parse_date(document, "modification_date")?;
        let creation = parse_date(document, "creation_date")?;
        if modification > creation {
            None
        } else {
            Some("modification_date must be larger than creation_date".to_string())
        }
    }
}

pub fn mod_date_lte_final_date(
) -> impl Fn(&Map<String, Value>) -> Option<String> + Send + Sync + 'static {
    |document| {
        let modification = parse_date(document, "modification_date")?;
        let finalized = parse_date(document, "final_date")?;
        if modification <= finalized {
            None
        } else {
            Some("modification_date must be less than or equal to final_date".to_string())
        }
    }
}

pub fn blog_post_schema() -> Schema {
    let validates: Vec<DocValidator> = vec![
        Arc::new(mod_date_gt_creation_date()),
        Arc::new(mod_date_lte_final_date()),
    ];
    Schema::with_validators([
        (
            "author",
            FieldSpec::required(TypeSpec::resolver(author_type)),
        ),
        (
            "content",
            FieldSpec::required(
                Schema::new([
                    ("title", FieldSpec::required(TypeSpec::String)),
                    ("text", FieldSpec::required(TypeSpec::String)),
                    ("page_views", FieldSpec::optional(TypeSpec::Int).default_value(1)),
                ])
                .unwrap(),
            ),
        ),
        (
            "meta",
            FieldSpec::required(
                Schema::new([("last_edited", FieldSpec::optional(TypeSpec::DateTime))]).unwrap(),
            )
            .nullable(true),
        ),
        (
            "category",
            FieldSpec::optional(TypeSpec::String).validate(one_of(["cooking", "politics"])),
        ),
        (
            "comments",
            FieldSpec::required(TypeSpec::array(TypeSpec::Object(comment_schema()))),
        ),
        ("likes", FieldSpec::optional(TypeSpec::Int).default_value(0)),
        (
            "creation_date",
            FieldSpec::optional(TypeSpec::DateTime).default_with(stubnow),
        ),
        (
            "tags",
            FieldSpec::optional(TypeSpec::array(TypeSpec::String))
                .default_value(json!(["blog"]))
                .validate(length(1, None)),
        ),
        (
            "misc",
            FieldSpec::optional(TypeSpec::mixed([TypeSpec::String, TypeSpec::Int])),
        ),
        (
            "linked_id",
            FieldSpec::optional(TypeSpec::mixed([TypeSpec::Int, TypeSpec::String])),
        ),
        (
            "external_code",
            FieldSpec::optional(TypeSpec::String).nullable(false),
        ),
        (
            "website",
            FieldSpec::optional(TypeSpec::resolver(website_type)),
        ),
        (
            "editors",
            FieldSpec::optional(TypeSpec::array(TypeSpec::resolver(editor_type))),
        ),
        // Defaults that do not themselves satisfy the comment schema: when
        // either field is absent, the default lands in the document and then
        // fails validation like any given value would.
        (
            "latest_comment",
            FieldSpec::optional(TypeSpec::Object(comment_schema())).default_value(json!({})),
        ),
        (
            "most_popular_comments",
            FieldSpec::optional(TypeSpec::array(TypeSpec::Object(comment_schema())))
                .default_value(json!([{}, {}, {}])),
        ),
        ("modification_date", FieldSpec::optional(TypeSpec::DateTime)),
        ("final_date", FieldSpec::optional(TypeSpec::DateTime)),
    ], validates)
    .unwrap()
}

/// A document that validates cleanly against [`blog_post_schema`].
pub fn valid_doc() -> Value {
    json!({
        "author": {
            "first": "John",
            "last": "Humphreys"
        },
        "content": {
            "title": "How to make cookies",
            "text": "First start by pre-heating the oven..."
        },
        "category": "cooking",
        "meta": null,
        "comments": [
            {
                "commenter": {"first": "Julio", "last": "Cesar"},
                "email": "jcesar@test.com",
                "comment": "Great post dude!"
            },
            {
                "commenter": {"first": "Michael", "last": "Andrews"},
                "comment": "My wife loves these."
            }
        ],
        "tags": ["cookies", "recipe", "yum"],
        "external_code": "ABC123",
        "website": {
            "url": "johnhumphreys.tumblr.com",
            "name": "John's Cooking Blog"
        },
        "latest_comment": {
            "commenter": {"first": "Julio", "last": "Cesar"},
            "comment": "Great post dude!"
        },
        "most_popular_comments": [
            {
                "commenter": {"first": "Michael", "last": "Andrews"},
                "comment": "My wife loves these."
            }
        ]
    })
}
