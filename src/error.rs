// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tonic::Status;
use utoipa::ToSchema;

use crate::grpc::status::translate_status;

/// Uniform body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Failures produced while serving a gateway request.
///
/// Every variant is rendered as an [`ErrorEnvelope`]; nothing escapes the
/// handler as an unhandled fault.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to parse form: {0}")]
    FormParse(String),

    #[error("failed to get file 'attachment': {0}")]
    MissingAttachment(String),

    #[error("failed to open upload stream: {}", describe(.0))]
    StreamOpen(Status),

    #[error("failed to send file meta: {}", describe(.0))]
    MetaSend(Status),

    #[error("failed to read chunk: {0}")]
    SourceRead(#[source] std::io::Error),

    #[error("failed to send chunk: {}", describe(.0))]
    ChunkSend(Status),

    #[error("failed to close upload stream: {}", describe(.0))]
    StreamClose(Status),

    #[error("deadline exceeded: upload stream did not complete within {}s", .0.as_secs_f64())]
    DeadlineExceeded(Duration),

    /// Failure reported by a backend on a passthrough call.
    #[error("backend call failed: {}", describe(.0))]
    Backend(Status),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::FormParse(_) | GatewayError::MissingAttachment(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::StreamOpen(_)
            | GatewayError::MetaSend(_)
            | GatewayError::SourceRead(_)
            | GatewayError::ChunkSend(_)
            | GatewayError::StreamClose(_)
            | GatewayError::DeadlineExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Backend(status) => translate_status(status).0,
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        match self {
            GatewayError::Backend(status) => translate_status(status).1,
            other => ErrorEnvelope::new(other.to_string()),
        }
    }
}

impl From<Status> for GatewayError {
    fn from(status: Status) -> Self {
        GatewayError::Backend(status)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.envelope().with_status(self.status_code())
    }
}

fn describe(status: &Status) -> String {
    format!("code = {:?} desc = {}", status.code(), status.message())
}
