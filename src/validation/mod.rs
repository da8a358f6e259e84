//! Review payload validation.
//!
//! A submission arrives as an arbitrary JSON value. Every field is checked and
//! all problems are reported together, one [`FieldError`] per offending field.
//! A payload that passes comes out as a [`Review`] with a server-assigned id
//! and timestamp; client-supplied `id`/`timestamp` values are ignored.

pub mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Review,
    review::{MAX_STARS, MIN_STARS},
};
use rules::{FieldLimits, neutralize_markup, strip_control_chars, text_rules};

pub const TITLE_MAX_CHARS: usize = 100;
pub const TAG_MAX_CHARS: usize = 30;
pub const COMMENT_MAX_CHARS: usize = 300;

const REQUIRED_FIELDS: [&str; 4] = ["title", "tag", "stars", "comment"];
// accepted in the body but never used
const IGNORED_FIELDS: [&str; 2] = ["id", "timestamp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Default)]
pub struct ReviewRules {
    /// When set, tags must match one of these (case-insensitive).
    pub allowed_tags: Option<Vec<String>>,
}

impl ReviewRules {
    pub fn with_allowed_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_tags: Some(tags.into_iter().map(Into::into).collect()),
        }
    }

    pub fn validate(&self, body: &Value) -> Result<Review, ValidationError> {
        validate_submission(body, self, Utc::now())
    }

    fn canonical_tag(&self, tag: &str) -> Result<String, String> {
        match &self.allowed_tags {
            None => Ok(tag.to_string()),
            Some(allowed) => allowed
                .iter()
                .find(|t| t.eq_ignore_ascii_case(tag))
                .cloned()
                .ok_or_else(|| format!("must be one of: {}", allowed.join(", "))),
        }
    }
}

pub fn validate_submission(
    body: &Value,
    rules: &ReviewRules,
    now: DateTime<Utc>,
) -> Result<Review, ValidationError> {
    let Some(fields) = body.as_object() else {
        return Err(ValidationError {
            errors: vec![FieldError::new("body", "must be a JSON object")],
        });
    };

    let mut errors = Vec::new();

    let title = text_field(
        fields.get("title"),
        "title",
        &FieldLimits {
            max_chars: TITLE_MAX_CHARS,
            keep_newlines: false,
        },
        &mut errors,
    );

    let tag = text_field(
        fields.get("tag"),
        "tag",
        &FieldLimits {
            max_chars: TAG_MAX_CHARS,
            keep_newlines: false,
        },
        &mut errors,
    )
    .and_then(|tag| match rules.canonical_tag(&tag) {
        Ok(tag) => Some(tag),
        Err(msg) => {
            errors.push(FieldError::new("tag", msg));
            None
        }
    });

    let stars = match fields.get("stars") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("stars", "field is required"));
            None
        }
        Some(value) => match parse_stars(value) {
            Ok(stars) => Some(stars),
            Err(msg) => {
                errors.push(FieldError::new("stars", msg));
                None
            }
        },
    };

    let comment = text_field(
        fields.get("comment"),
        "comment",
        &FieldLimits {
            max_chars: COMMENT_MAX_CHARS,
            keep_newlines: true,
        },
        &mut errors,
    );

    for key in fields.keys() {
        let key = key.as_str();
        if !REQUIRED_FIELDS.contains(&key) && !IGNORED_FIELDS.contains(&key) {
            errors.push(FieldError::new(key, "unexpected field"));
        }
    }

    match (title, tag, stars, comment) {
        (Some(title), Some(tag), Some(stars), Some(comment)) if errors.is_empty() => Ok(Review {
            id: Uuid::new_v4(),
            title: neutralize_markup(&title),
            tag: neutralize_markup(&tag),
            stars,
            comment: neutralize_markup(&comment),
            timestamp: now,
        }),
        _ => Err(ValidationError { errors }),
    }
}

/// Checks one free-text field. Returns the cleaned (not yet escaped) text.
fn text_field(
    value: Option<&Value>,
    field: &str,
    limits: &FieldLimits,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let raw = match value {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, "field is required"));
            return None;
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            errors.push(FieldError::new(field, "must be a string"));
            return None;
        }
    };

    let cleaned = strip_control_chars(raw, limits).trim().to_string();

    for rule in text_rules() {
        if let Err(msg) = (rule.validate)(&cleaned, limits) {
            errors.push(FieldError::new(field, msg));
            return None;
        }
    }

    Some(cleaned)
}

fn parse_stars(value: &Value) -> Result<u8, String> {
    let stars = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| "must be a whole number between 1 and 5".to_string())?;

    if (i64::from(MIN_STARS)..=i64::from(MAX_STARS)).contains(&stars) {
        Ok(stars as u8)
    } else {
        Err(format!(
            "must be between {MIN_STARS} and {MAX_STARS}, got {stars}"
        ))
    }
}
