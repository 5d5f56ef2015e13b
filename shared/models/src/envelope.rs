//! Response envelope shared by the HTTP handlers and the client store.

use serde::{Deserialize, Serialize};

use crate::schema::{FieldViolation, ValidationError};

/// `{ success, message?, data?, errors? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Wire form of a [`FieldViolation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&FieldViolation> for FieldError {
    fn from(violation: &FieldViolation) -> Self {
        Self {
            field: violation.field(),
            message: violation.message.clone(),
        }
    }
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }

    pub fn invalid(message: impl Into<String>, error: &ValidationError) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: Some(error.violations.iter().map(FieldError::from).collect()),
        }
    }
}
