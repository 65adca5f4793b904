// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Backend status translation.
//!
//! Maps a gRPC [`Code`] onto the closest HTTP status and builds the error
//! envelope for it. Authentication and internal failures get fixed messages so
//! that credential and implementation details stay on the backend side; every
//! other code passes the backend message through untouched.

use axum::http::StatusCode;
use tonic::{Code, Status};

use crate::error::ErrorEnvelope;

/// Message returned for every backend authentication failure.
pub const UNAUTHENTICATED_MESSAGE: &str = "missing or invalid 'Authorization: Bearer ...'";

/// Message returned for every backend internal failure.
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// Non-standard status used for client-cancelled calls.
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// HTTP status corresponding to a gRPC code.
pub fn http_status_from_code(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        Code::Cancelled => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::REQUEST_TIMEOUT)
        }
        Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            StatusCode::BAD_REQUEST
        }
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::Unauthenticated | Code::PermissionDenied => StatusCode::UNAUTHORIZED,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Translate a backend failure into the HTTP status and envelope to send.
pub fn translate_status(status: &Status) -> (StatusCode, ErrorEnvelope) {
    let http_status = http_status_from_code(status.code());
    let envelope = match http_status {
        StatusCode::UNAUTHORIZED => ErrorEnvelope::new(UNAUTHENTICATED_MESSAGE),
        StatusCode::INTERNAL_SERVER_ERROR => ErrorEnvelope::new(INTERNAL_MESSAGE),
        _ => ErrorEnvelope::new(status.message()),
    };
    (http_status, envelope)
}
