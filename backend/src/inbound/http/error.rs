//! Turns domain [`Error`]s into JSON responses.
//!
//! Status codes follow the error code. Internal failures are logged in full
//! and sent to the client with a fixed message; every response that has a
//! trace id repeats it in the `trace-id` header.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message clients see in place of an internal failure.
pub const REDACTED_MESSAGE: &str = "Internal server error";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The payload actually written to the wire.
fn client_view(err: &Error) -> Error {
    if err.code() != ErrorCode::InternalError {
        return err.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match err.trace_id() {
        Some(trace_id) => redacted.with_trace_id(trace_id.to_owned()),
        None => redacted,
    }
}

fn log_server_failure(err: &Error, status: StatusCode) {
    let trace_id = err.trace_id().unwrap_or("-");
    match err.code() {
        ErrorCode::InternalError => {
            error!(
                %trace_id,
                status = status.as_u16(),
                message = err.message(),
                "request failed"
            );
        }
        ErrorCode::ServiceUnavailable => {
            warn!(
                %trace_id,
                status = status.as_u16(),
                message = err.message(),
                "record store unavailable"
            );
        }
        _ => {}
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        log_server_failure(self, status);

        let mut response = HttpResponse::build(status);
        if let Some(trace_id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, trace_id.to_owned()));
        }
        response.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced through a handler");
        Self::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
