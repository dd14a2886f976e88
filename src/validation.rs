//! Field-level validation for entities before they reach the store.
//!
//! Range and format rules are declared with `validator` derives on the models
//! and payloads. Their reports are folded into `ValidationErrors`, a single
//! field to message map, together with the required-field and identifier
//! checks that depend on how a payload arrived.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use uuid::Uuid;
use validator::ValidationError;

pub const NOT_BLANK: &str = "This value should not be blank.";
pub const REQUIRED: &str = "This field is required";
pub const INVALID_EMAIL: &str = "This value is not a valid email address.";

const NOT_BLANK_CODE: &str = "not_blank";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation; the first message for a field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Fold another set of violations in without overwriting existing ones
    pub fn merge(&mut self, other: impl Into<ValidationErrors>) {
        for (field, message) in other.into().fields {
            self.add(field, message);
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Unwrap a required change-set field, recording it as missing when absent
    pub fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, REQUIRED);
        }
        value
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(report: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, violations) in report.field_errors() {
            // A blank value also fails its length rule; report the blank one
            let chosen = violations
                .iter()
                .find(|v| v.code == NOT_BLANK_CODE)
                .or_else(|| violations.first());
            if let Some(violation) = chosen {
                errors.add(field.to_string(), message_for(violation));
            }
        }
        errors
    }
}

fn message_for(violation: &ValidationError) -> String {
    match &violation.message {
        Some(message) => message.to_string(),
        None => format!("This value is invalid ({}).", violation.code),
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.fields.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "Invalid inputs ({})", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Custom `validator` rule rejecting empty or whitespace-only text
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new(NOT_BLANK_CODE);
        error.message = Some(Cow::Borrowed(NOT_BLANK));
        return Err(error);
    }
    Ok(())
}

/// Parse an identifier supplied by a client
pub fn parse_id(field: &str, value: &str) -> Result<Uuid, ValidationErrors> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.add(field, format!("Invalid UUID format: {}", value));
        errors
    })
}
