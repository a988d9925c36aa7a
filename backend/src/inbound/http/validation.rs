//! Shared validation helpers for inbound HTTP adapters.

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Validation error codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::MalformedBody => "malformed_body",
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

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
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
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a positive integer"))
        .with_value(ErrorCode::InvalidId, value)
}

/// Unwrap an optional body field, reporting it as missing otherwise.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a path segment into a positive record id.
pub(crate) fn parse_id(raw: &str, field: FieldName) -> Result<i32, Error> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| invalid_id_error(field, raw))
}

/// JSON extractor configuration reporting unreadable bodies in the error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected request body");
        let error = ValidationError::new(FieldName::new("body"), "request body must be a JSON object")
            .with_code(ErrorCode::MalformedBody);
        error.into()
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ErrorCode as DomainCode;

    const TASK_ID: FieldName = FieldName::new("task_id");

    #[rstest]
    #[case("7", 7)]
    #[case(" 12 ", 12)]
    fn ids_parse(#[case] raw: &str, #[case] expected: i32) {
        assert_eq!(parse_id(raw, TASK_ID).expect("valid id"), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("abc")]
    #[case("99999999999")]
    fn invalid_ids_are_rejected(#[case] raw: &str) {
        let err = parse_id(raw, TASK_ID).expect_err("invalid id");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "task_id", "value": raw, "code": "invalid_id"}))
        );
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require::<String>(None, FieldName::new("doctor_name")).expect_err("missing");
        assert_eq!(err.message(), "missing required field: doctor_name");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "doctor_name", "code": "missing_field"}))
        );
        assert_eq!(
            require(Some(3), FieldName::new("created_by")).expect("present"),
            3
        );
    }
}
