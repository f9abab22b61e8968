//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected request carries `details` of the form
//! `{"field": ..., "code": ...}` so clients can point at the offending input.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use pagination::{PageParams, PageRequest};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, FieldError, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Unwrap a required body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Map a rejected user value onto the field it came from.
pub(crate) fn user_value_error(field: &'static str, err: &UserValidationError) -> Error {
    let error = match err {
        UserValidationError::EmptyName
        | UserValidationError::EmptyEmail
        | UserValidationError::EmptyContactNumber => FieldError::missing(field),
        other => FieldError::invalid(field, other.to_string()),
    };
    error.into()
}

/// Validate `page`/`page_size` query parameters.
pub(crate) fn page_request(params: PageParams) -> Result<PageRequest, Error> {
    PageRequest::try_from(params).map_err(|err| {
        ValidationError::new(err.field(), err.to_string()).with_code(ErrorCode::InvalidValue)
    })
}

fn rejected_body(err: &JsonPayloadError) -> Error {
    let detail = match err {
        JsonPayloadError::Deserialize(inner) => inner.to_string(),
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        other => other.to_string(),
    };
    Error::invalid_request(format!("invalid request body: {detail}"))
        .with_details(json!({"field": "body", "code": ErrorCode::InvalidValue.as_str()}))
}

fn rejected_query(err: &QueryPayloadError) -> Error {
    Error::invalid_request(format!("invalid query string: {err}"))
        .with_details(json!({"field": "query", "code": ErrorCode::InvalidValue.as_str()}))
}

fn rejected_path(err: &PathError) -> Error {
    Error::invalid_request(format!("invalid path parameter: {err}"))
        .with_details(json!({"field": "path", "code": ErrorCode::InvalidValue.as_str()}))
}

/// JSON extractor configuration rendering failures in the API envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| rejected_body(&err).into())
}

/// Query extractor configuration rendering failures in the API envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| rejected_query(&err).into())
}

/// Path extractor configuration rendering failures in the API envelope.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| rejected_path(&err).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require::<String>(None, FieldName::new("refresh_token")).expect_err("missing");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "refresh_token", "code": "missing_field"}))
        );
    }

    #[rstest]
    fn malformed_uuids_echo_the_value() {
        let err = parse_uuid("not-a-uuid", FieldName::new("id")).expect_err("invalid");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "id", "value": "not-a-uuid", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    #[case(Some(0), None, "page")]
    #[case(None, Some(0), "page_size")]
    fn zero_pagination_values_are_rejected(
        #[case] page: Option<u32>,
        #[case] page_size: Option<u32>,
        #[case] field: &str,
    ) {
        let err = page_request(PageParams { page, page_size }).expect_err("zero");
        assert_eq!(err.details(), Some(&json!({"field": field, "code": "invalid_value"})));
    }

    #[rstest]
    fn oversized_pages_are_clamped() {
        let request = page_request(PageParams {
            page: Some(2),
            page_size: Some(500),
        })
        .expect("valid");
        assert_eq!(request.page_size(), pagination::MAX_PAGE_SIZE);
    }

    #[rstest]
    #[case(UserValidationError::EmptyEmail, "missing_field")]
    #[case(UserValidationError::InvalidEmail, "invalid_value")]
    #[case(UserValidationError::NameNotAlphabetic, "invalid_value")]
    fn user_value_errors_map_to_field_codes(
        #[case] err: UserValidationError,
        #[case] code: &str,
    ) {
        let mapped = user_value_error("email", &err);
        assert_eq!(mapped.details(), Some(&json!({"field": "email", "code": code})));
    }
}
