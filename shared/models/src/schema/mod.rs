//! Schema descriptions for the paper forms.
//!
//! A [`Schema`] is a plain value listing every field of a document together
//! with its kind, its constraints and what happens when the field is absent.
//! One description exists per document type and it is interpreted by the
//! same walker on the client (before a form is submitted) and on the server
//! (before anything is persisted), so both sides accept exactly the same
//! documents.
//!
//! Interpreting a schema either yields a normalized value (unknown keys
//! dropped, strings trimmed, defaults filled in) or a [`ValidationError`]
//! listing every violation with the path of the offending field.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

mod final_inspection;
mod job_sheet;

pub use final_inspection::final_inspection_report_schema;
pub use job_sheet::job_sheet_schema;

/// Largest value an integer field backed by a `u32` can hold.
pub const U32_LIMIT: f64 = u32::MAX as f64;

/// One step of a [`FieldPath`]: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Location of a field inside a nested document, rendered in dot notation
/// (`finalAcceptance.rows.0.slNo`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Parses a dot-notation path. Purely numeric segments become indices.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self(
            dotted
                .split('.')
                .map(|segment| match segment.parse::<usize>() {
                    Ok(index) => PathSegment::Index(index),
                    Err(_) => PathSegment::Key(segment.to_string()),
                })
                .collect(),
        )
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub path: FieldPath,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Dot-notation name of the offending field.
    pub fn field(&self) -> String {
        self.path.to_string()
    }
}

/// Ordered list of violations produced by a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn single(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation::new(path, message)],
        }
    }

    /// First message reported for the given dot-notation path.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field() == field)
            .map(|v| v.message.as_str())
    }
}

/// What the walker does when a field is missing or `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    Default(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text {
        trim: bool,
        min_len: Option<(usize, &'static str)>,
    },
    /// Text that has to parse as a calendar date.
    Date,
    Number {
        integer: bool,
        min: Option<(f64, &'static str)>,
        max: Option<(f64, &'static str)>,
    },
    Boolean,
    Choice(&'static [&'static str]),
    Object(Vec<Field>),
    List {
        item: Box<FieldKind>,
        min_items: Option<(usize, &'static str)>,
        distinct: bool,
    },
}

impl FieldKind {
    pub fn text() -> Self {
        Self::Text {
            trim: true,
            min_len: None,
        }
    }

    pub fn choice(values: &'static [&'static str]) -> Self {
        Self::Choice(values)
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Self::Object(fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub required_message: Option<&'static str>,
}

impl Field {
    fn with(name: &'static str, kind: FieldKind, presence: Presence) -> Self {
        Self {
            name,
            kind,
            presence,
            required_message: None,
        }
    }

    /// Trimmed free text, `""` when absent.
    pub fn text(name: &'static str) -> Self {
        Self::with(name, FieldKind::text(), Presence::Default(Value::from("")))
    }

    /// Required text that must parse as a date.
    pub fn date(name: &'static str) -> Self {
        Self::with(name, FieldKind::Date, Presence::Required)
    }

    pub fn number(name: &'static str) -> Self {
        Self::with(
            name,
            FieldKind::Number {
                integer: false,
                min: None,
                max: None,
            },
            Presence::Required,
        )
    }

    /// Flag, `false` when absent.
    pub fn boolean(name: &'static str) -> Self {
        Self::with(name, FieldKind::Boolean, Presence::Default(Value::Bool(false)))
    }

    pub fn choice(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::with(name, FieldKind::Choice(values), Presence::Required)
    }

    pub fn object(name: &'static str, fields: Vec<Field>) -> Self {
        Self::with(name, FieldKind::Object(fields), Presence::Required)
    }

    /// Repeated values, `[]` when absent.
    pub fn list(name: &'static str, item: FieldKind) -> Self {
        Self::with(
            name,
            FieldKind::List {
                item: Box::new(item),
                min_items: None,
                distinct: false,
            },
            Presence::Default(Value::Array(Vec::new())),
        )
    }

    /// Marks the field as mandatory. Text fields additionally reject blank
    /// input with the same message.
    pub fn required(mut self, message: &'static str) -> Self {
        self.presence = Presence::Required;
        self.required_message = Some(message);
        if let FieldKind::Text { min_len, .. } = &mut self.kind {
            *min_len = Some((1, message));
        }
        self
    }

    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.presence = Presence::Default(value.into());
        self
    }

    pub fn untrimmed(mut self) -> Self {
        if let FieldKind::Text { trim, .. } = &mut self.kind {
            *trim = false;
        }
        self
    }

    pub fn integer(mut self) -> Self {
        if let FieldKind::Number { integer, .. } = &mut self.kind {
            *integer = true;
        }
        self
    }

    pub fn min(mut self, bound: f64, message: &'static str) -> Self {
        if let FieldKind::Number { min, .. } = &mut self.kind {
            *min = Some((bound, message));
        }
        self
    }

    pub fn max(mut self, bound: f64, message: &'static str) -> Self {
        if let FieldKind::Number { max, .. } = &mut self.kind {
            *max = Some((bound, message));
        }
        self
    }

    pub fn min_items(mut self, count: usize, message: &'static str) -> Self {
        if let FieldKind::List { min_items, .. } = &mut self.kind {
            *min_items = Some((count, message));
        }
        self
    }

    /// Collapses repeated entries, keeping the first occurrence.
    pub fn distinct(mut self) -> Self {
        if let FieldKind::List { distinct, .. } = &mut self.kind {
            *distinct = true;
        }
        self
    }
}

/// Field description of one document type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<Field>) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Walks `input` against the description, returning the normalized
    /// document or every violation found.
    pub fn normalize(&self, input: &Value) -> Result<Value, ValidationError> {
        let mut violations = Vec::new();
        let normalized = match input {
            Value::Object(map) => {
                normalize_object(&self.fields, map, &FieldPath::root(), &mut violations)
            }
            other => {
                violations.push(FieldViolation::new(
                    FieldPath::root(),
                    type_mismatch("object", other),
                ));
                Value::Null
            }
        };

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Normalizes `input` and decodes it into the static model type.
    pub fn validate<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationError> {
        let normalized = self.normalize(input)?;
        serde_json::from_value(normalized).map_err(|e| {
            ValidationError::single(
                FieldPath::root(),
                format!("{} does not match its model: {}", self.name, e),
            )
        })
    }
}

fn normalize_object(
    fields: &[Field],
    input: &Map<String, Value>,
    path: &FieldPath,
    violations: &mut Vec<FieldViolation>,
) -> Value {
    let mut out = Map::new();

    for field in fields {
        let field_path = path.key(field.name);
        let value = input.get(field.name).filter(|v| !v.is_null());

        let normalized = match (value, &field.presence) {
            (Some(value), _) => normalize_value(&field.kind, value, &field_path, violations),
            (None, Presence::Required) => {
                violations.push(FieldViolation::new(
                    field_path,
                    field.required_message.unwrap_or("Required"),
                ));
                None
            }
            (None, Presence::Optional) => None,
            (None, Presence::Default(default)) => {
                normalize_value(&field.kind, default, &field_path, violations)
            }
        };

        if let Some(normalized) = normalized {
            out.insert(field.name.to_string(), normalized);
        }
    }

    Value::Object(out)
}

fn normalize_value(
    kind: &FieldKind,
    value: &Value,
    path: &FieldPath,
    violations: &mut Vec<FieldViolation>,
) -> Option<Value> {
    match kind {
        FieldKind::Text { trim, min_len } => {
            let Value::String(text) = value else {
                return reject(violations, path, type_mismatch("string", value));
            };
            let text = if *trim { text.trim() } else { text.as_str() };
            match min_len {
                Some((min, message)) if text.chars().count() < *min => {
                    reject(violations, path, *message)
                }
                _ => Some(Value::String(text.to_string())),
            }
        }
        FieldKind::Date => {
            let Value::String(text) = value else {
                return reject(violations, path, type_mismatch("string", value));
            };
            let text = text.trim();
            if is_valid_form_date(text) {
                Some(Value::String(text.to_string()))
            } else {
                reject(violations, path, "Invalid date format".to_string())
            }
        }
        FieldKind::Number { integer, min, max } => {
            let Some(number) = value.as_f64() else {
                return reject(violations, path, type_mismatch("number", value));
            };
            if *integer && number.fract() != 0.0 {
                return reject(violations, path, "Expected integer, received float".to_string());
            }
            if let Some((bound, message)) = min {
                if number < *bound {
                    return reject(violations, path, *message);
                }
            }
            if let Some((bound, message)) = max {
                if number > *bound {
                    return reject(violations, path, *message);
                }
            }
            if *integer {
                Some(Value::from(number as i64))
            } else {
                Some(value.clone())
            }
        }
        FieldKind::Boolean => match value {
            Value::Bool(_) => Some(value.clone()),
            other => reject(violations, path, type_mismatch("boolean", other)),
        },
        FieldKind::Choice(options) => match value {
            Value::String(choice) if options.contains(&choice.as_str()) => Some(value.clone()),
            Value::String(choice) => reject(violations, path, format!(
                "Invalid enum value. Expected {}, received '{}'",
                options
                    .iter()
                    .map(|o| format!("'{}'", o))
                    .collect::<Vec<_>>()
                    .join(" | "),
                choice
            )),
            other => reject(violations, path, type_mismatch("string", other)),
        },
        FieldKind::Object(fields) => match value {
            Value::Object(map) => Some(normalize_object(fields, map, path, violations)),
            other => reject(violations, path, type_mismatch("object", other)),
        },
        FieldKind::List {
            item,
            min_items,
            distinct,
        } => {
            let Value::Array(items) = value else {
                return reject(violations, path, type_mismatch("array", value));
            };
            let reported = violations.len();
            let mut out: Vec<Value> = Vec::with_capacity(items.len());
            for (index, entry) in items.iter().enumerate() {
                if let Some(normalized) =
                    normalize_value(item, entry, &path.index(index), violations)
                {
                    if !(*distinct && out.contains(&normalized)) {
                        out.push(normalized);
                    }
                }
            }
            if violations.len() > reported {
                return None;
            }
            match min_items {
                Some((min, message)) if out.len() < *min => reject(violations, path, *message),
                _ => Some(Value::Array(out)),
            }
        }
    }
}

fn reject(
    violations: &mut Vec<FieldViolation>,
    path: &FieldPath,
    message: impl Into<String>,
) -> Option<Value> {
    violations.push(FieldViolation::new(path.clone(), message));
    None
}

fn type_mismatch(expected: &str, received: &Value) -> String {
    let received = match received {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("Expected {}, received {}", expected, received)
}

/// Whether `text` is a date the paper forms accept: RFC 3339, `YYYY-MM-DD`
/// or a `datetime-local` value.
pub fn is_valid_form_date(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty()
        && (DateTime::parse_from_rfc3339(text).is_ok()
            || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
            || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").is_ok()
            || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> Schema {
        Schema::new(
            "sample",
            vec![
                Field::text("name").required("Name is required"),
                Field::text("note"),
                Field::number("count").integer().min(1.0, "Count must be at least 1"),
                Field::list("tags", FieldKind::choice(&["a", "b"]))
                    .distinct()
                    .min_items(1, "At least one tag is required"),
                Field::object(
                    "rows",
                    vec![Field::list(
                        "items",
                        FieldKind::object(vec![Field::number("slNo").integer()]),
                    )],
                )
                .default_value(json!({})),
            ],
        )
    }

    #[test]
    fn test_field_path_display_and_parse() {
        let path = FieldPath::root().key("rows").index(2).key("slNo");
        assert_eq!(path.to_string(), "rows.2.slNo");
        assert_eq!(FieldPath::parse("rows.2.slNo"), path);
        assert!(FieldPath::parse("").is_root());
    }

    #[test]
    fn test_defaults_are_filled_and_unknown_keys_dropped() {
        let normalized = sample_schema()
            .normalize(&json!({"name": "  Flex  ", "count": 2, "tags": ["a", "a", "b"], "extra": 1}))
            .unwrap();

        assert_eq!(
            normalized,
            json!({"name": "Flex", "note": "", "count": 2, "tags": ["a", "b"], "rows": {"items": []}})
        );
    }

    #[test]
    fn test_violations_carry_exact_paths() {
        let err = sample_schema()
            .normalize(&json!({
                "name": "   ",
                "count": 0,
                "tags": [],
                "rows": {"items": [{"slNo": 1}, {"slNo": "two"}]}
            }))
            .unwrap_err();

        assert_eq!(err.message_for("name"), Some("Name is required"));
        assert_eq!(err.message_for("count"), Some("Count must be at least 1"));
        assert_eq!(err.message_for("tags"), Some("At least one tag is required"));
        assert_eq!(
            err.message_for("rows.items.1.slNo"),
            Some("Expected number, received string")
        );
    }

    #[test]
    fn test_missing_required_uses_default_message() {
        let err = sample_schema()
            .normalize(&json!({"name": "x", "tags": ["a"]}))
            .unwrap_err();
        assert_eq!(err.message_for("count"), Some("Required"));
    }

    #[test]
    fn test_choice_rejects_unknown_value() {
        let err = sample_schema()
            .normalize(&json!({"name": "x", "count": 1, "tags": ["z"]}))
            .unwrap_err();
        assert_eq!(
            err.message_for("tags.0"),
            Some("Invalid enum value. Expected 'a' | 'b', received 'z'")
        );
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = sample_schema().normalize(&json!([1, 2])).unwrap_err();
        assert_eq!(err.violations[0].path, FieldPath::root());
    }

    #[test]
    fn test_form_dates() {
        assert!(is_valid_form_date("2024-05-01"));
        assert!(is_valid_form_date("2024-05-01T10:30"));
        assert!(is_valid_form_date("2024-05-01T10:30:00Z"));
        assert!(!is_valid_form_date(""));
        assert!(!is_valid_form_date("yesterday"));
        assert!(!is_valid_form_date("2024-13-01"));
    }
}
