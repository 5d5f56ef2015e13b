use std::borrow::Cow;

use flexiflo_models::{FieldPath, FieldViolation};
use mongodb::bson::oid::ObjectId;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{FlexifloError, FlexifloResult};

pub fn validate_model<T: Validate>(model: &T) -> FlexifloResult<()> {
    model.validate().map_err(FlexifloError::from)
}

/// Flattens nested `validator` errors into dot-path violations, using the
/// wire (camelCase) field names. Output is sorted by path.
pub fn collect_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    walk(errors, &FieldPath::root(), &mut violations);
    violations.sort_by_key(|v| v.field());
    violations
}

fn walk(errors: &ValidationErrors, path: &FieldPath, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = path.key(wire_name(field));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(FieldViolation::new(path.clone(), describe(error)));
                }
            }
            ValidationErrorsKind::Struct(nested) => walk(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    walk(nested, &path.index(*index), out);
                }
            }
        }
    }
}

fn describe(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match &error.code {
        Cow::Borrowed("length") => "Length validation failed".to_string(),
        Cow::Borrowed("range") => "Value out of range".to_string(),
        Cow::Borrowed("required") => "Required".to_string(),
        code => format!("Validation failed: {}", code),
    }
}

/// Rust field name to the name used on the wire.
fn wire_name(field: &str) -> String {
    match field {
        "test_type" => "type".to_string(),
        "duration_wp" => "durationWP".to_string(),
        "duration_tp" => "durationTP".to_string(),
        _ => {
            let mut name = String::with_capacity(field.len());
            let mut upper = false;
            for c in field.chars() {
                if c == '_' {
                    upper = true;
                } else if upper {
                    name.extend(c.to_uppercase());
                    upper = false;
                } else {
                    name.push(c);
                }
            }
            name
        }
    }
}

/// Parses a record identifier taken from a URL.
pub fn parse_record_id(id: &str) -> FlexifloResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| FlexifloError::invalid_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexiflo_models::{JobSheet, StaticPressure};
    use serde_json::json;

    #[test]
    fn test_wire_names() {
        assert_eq!(wire_name("flx_tag_no"), "flxTagNo");
        assert_eq!(wire_name("quantity"), "quantity");
        assert_eq!(wire_name("before_at_10psi"), "beforeAt10psi");
        assert_eq!(wire_name("test_type"), "type");
    }

    #[test]
    fn test_nested_errors_are_flattened() {
        let mut job: JobSheet = serde_json::from_value(json!({
            "orderDetails": {"customer": "Acme", "flxTagNo": "F-1", "deliveryDueDate": "2024-06-30"},
            "jobDetails": {
                "hoseType": "Composite",
                "hoseId": "2in",
                "quantity": 1,
                "fittingType": {},
                "moc": ["SS"],
                "traceability": {"hoseBatchNumber": "HB-1"}
            },
            "footer": {"supervisorSignature": "R. Patel", "date": "2024-06-01"}
        }))
        .unwrap();
        assert!(validate_model(&job).is_ok());

        job.job_details.quantity = 0;
        job.footer.date = "tomorrow".to_string();
        let error = validate_model(&job).unwrap_err();
        let fields: Vec<String> = error.violations().iter().map(|v| v.field()).collect();
        assert_eq!(fields, vec!["footer.date", "jobDetails.quantity"]);
        assert_eq!(error.violations()[1].message, "Quantity must be at least 1");
    }

    #[test]
    fn test_renamed_field() {
        let pressure: StaticPressure = serde_json::from_value(json!({"type": ""})).unwrap();
        let violations = collect_violations(&pressure.validate().unwrap_err());
        assert_eq!(violations[0].field(), "type");
        assert_eq!(violations[0].message, "Type is required");
    }

    #[test]
    fn test_parse_record_id() {
        assert!(parse_record_id("507f1f77bcf86cd799439011").is_ok());
        let error = parse_record_id("not-an-id").unwrap_err();
        assert_eq!(error.error_code(), "INVALID_ID");
    }
}
