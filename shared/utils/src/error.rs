use flexiflo_models::{FieldPath, FieldViolation, ValidationError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum FlexifloError {
    #[error("Validation error: {} field(s) rejected", .violations.len())]
    Validation { violations: Vec<FieldViolation> },

    #[error("Invalid record id: {id}")]
    InvalidId { id: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Duplicate key: {message}")]
    DuplicateKey { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl FlexifloError {
    pub fn validation(field: impl AsRef<str>, message: impl Into<String>) -> Self {
        Self::Validation {
            violations: vec![FieldViolation::new(
                FieldPath::parse(field.as_ref()),
                message,
            )],
        }
    }

    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidId { .. } => "INVALID_ID",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateKey { .. } => "DUPLICATE_KEY",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::InvalidId { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::DuplicateKey { .. } => 409,
            Self::Persistence { .. } => 500,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }

    /// Whether the error describes something the caller did. Everything
    /// else is logged in full and reported with a generic message.
    pub fn is_client_facing(&self) -> bool {
        self.http_status_code() < 500
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}

pub type FlexifloResult<T> = Result<T, FlexifloError>;

impl From<ValidationError> for FlexifloError {
    fn from(error: ValidationError) -> Self {
        Self::Validation {
            violations: error.violations,
        }
    }
}

impl From<validator::ValidationErrors> for FlexifloError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation {
            violations: crate::validation::collect_violations(&errors),
        }
    }
}

impl From<mongodb::error::Error> for FlexifloError {
    fn from(error: mongodb::error::Error) -> Self {
        if is_duplicate_key(&error) {
            Self::duplicate_key(error.to_string())
        } else {
            Self::persistence(error.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for FlexifloError {
    fn from(error: mongodb::bson::ser::Error) -> Self {
        Self::persistence(format!("BSON encoding failed: {}", error))
    }
}

impl From<mongodb::bson::de::Error> for FlexifloError {
    fn from(error: mongodb::bson::de::Error) -> Self {
        Self::persistence(format!("BSON decoding failed: {}", error))
    }
}

impl From<serde_json::Error> for FlexifloError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON conversion failed: {}", error))
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        ErrorKind::BulkWrite(failure) => failure
            .write_errors
            .iter()
            .flatten()
            .any(|e| e.code == DUPLICATE_KEY_CODE),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FlexifloError::validation("a.b", "bad").http_status_code(), 400);
        assert_eq!(FlexifloError::invalid_id("xyz").http_status_code(), 400);
        assert_eq!(FlexifloError::not_found("job sheet").http_status_code(), 404);
        assert_eq!(FlexifloError::duplicate_key("E11000").http_status_code(), 409);
        assert_eq!(FlexifloError::persistence("down").http_status_code(), 500);
        assert_eq!(FlexifloError::internal("boom").error_code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_client_facing() {
        assert!(FlexifloError::not_found("x").is_client_facing());
        assert!(!FlexifloError::persistence("x").is_client_facing());
        assert!(!FlexifloError::configuration("x").is_client_facing());
    }

    #[test]
    fn test_schema_rejection_keeps_paths() {
        let error: FlexifloError = ValidationError::single(
            FieldPath::root().key("jobDetails").key("quantity"),
            "Quantity must be at least 1",
        )
        .into();
        assert_eq!(error.violations()[0].field(), "jobDetails.quantity");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_duplicate_key_write_is_conflict() {
        let write_error: mongodb::error::WriteError = mongodb::bson::from_document(
            mongodb::bson::doc! {"code": 11000, "errmsg": "E11000 duplicate key error collection: flexiflo.jobs"},
        )
        .unwrap();
        let error: FlexifloError = mongodb::error::Error::from(ErrorKind::Write(
            WriteFailure::WriteError(write_error),
        ))
        .into();

        assert_eq!(error.error_code(), "DUPLICATE_KEY");
        assert_eq!(error.http_status_code(), 409);
        assert!(error.is_client_facing());
    }

    #[test]
    fn test_other_write_error_is_persistence() {
        let write_error: mongodb::error::WriteError =
            mongodb::bson::from_document(mongodb::bson::doc! {"code": 121, "errmsg": "Document failed validation"})
                .unwrap();
        let error: FlexifloError = mongodb::error::Error::from(ErrorKind::Write(
            WriteFailure::WriteError(write_error),
        ))
        .into();
        assert_eq!(error.error_code(), "PERSISTENCE_ERROR");
    }

    #[test]
    fn test_non_duplicate_driver_error_is_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let error: FlexifloError = mongodb::error::Error::from(io).into();
        assert_eq!(error.error_code(), "PERSISTENCE_ERROR");
    }
}
