//! Tests for HTTP error mapping.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("eksik alan"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("görev bulunamadı"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("MALI_ISLER rolünde kullanıcı yok"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("veritabanı yok"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn decode(error: &Error) -> (StatusCode, Option<String>, Error) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("header is ascii").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let payload = serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds");
    (status, header, payload)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let (status, header, payload) = decode(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(payload.message(), REDACTED_MESSAGE);
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("doctor_name is required")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "doctor_name", "code": "missing_field"}));

    let (status, header, payload) = decode(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(payload, error);
}

#[rstest]
#[actix_web::test]
async fn untraced_errors_send_no_header() {
    let (status, header, payload) = decode(&Error::not_found("contract 9 not found")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(header.is_none());
    assert!(payload.trace_id().is_none());
}

#[rstest]
fn actix_errors_become_internal() {
    let actix_error = actix_web::error::ErrorBadGateway("upstream");
    let error = Error::from(actix_error);
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), REDACTED_MESSAGE);
}
