//! Field-level validation failures shared by the catalogue and seller models.
//!
//! A [`FieldError`] names the offending request field and a stable code so
//! adapters can render `{"field": ..., "code": ...}` details.

use std::fmt;

use serde_json::json;

use crate::domain::Error;

/// Stable validation failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    MissingField,
    TooLong,
    InvalidValue,
    DiscountExceedsPrice,
}

impl FieldErrorCode {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::TooLong => "too_long",
            Self::InvalidValue => "invalid_value",
            Self::DiscountExceedsPrice => "discount_exceeds_price",
        }
    }
}

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    code: FieldErrorCode,
    message: String,
}

impl FieldError {
    pub fn new(field: &'static str, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// Required field absent or blank.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::new(field, FieldErrorCode::MissingField, format!("missing required field: {field}"))
    }

    /// Field present but unacceptable.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(field, FieldErrorCode::InvalidValue, message)
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    #[must_use]
    pub const fn code(&self) -> FieldErrorCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FieldError {}

impl From<FieldError> for Error {
    fn from(value: FieldError) -> Self {
        Self::invalid_request(value.message).with_details(json!({
            "field": value.field,
            "code": value.code.as_str(),
        }))
    }
}

/// Trim and require a non-empty value of at most `max` characters.
pub fn required_text(field: &'static str, raw: Option<String>, max: usize) -> Result<String, FieldError> {
    match optional_text(field, raw, max)? {
        Some(value) => Ok(value),
        None => Err(FieldError::missing(field)),
    }
}

/// Trim an optional value; blank input becomes `None`.
pub fn optional_text(
    field: &'static str,
    raw: Option<String>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(FieldError::new(
            field,
            FieldErrorCode::TooLong,
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(Some(trimmed.to_owned()))
}
