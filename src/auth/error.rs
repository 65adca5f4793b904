// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::ErrorEnvelope;

/// Classified outcome of a failed credential check.
///
/// The `Display` text is the fixed category string sent to the client. It
/// never carries decoder or signature details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Neither the header nor the query parameter carried a credential.
    ///
    /// The gate treats this as an anonymous request, not a rejection.
    #[error("no credential")]
    NoCredentialPresent,
    /// The token could not be decoded or lacks the identity claims.
    #[error("malformed")]
    MalformedCredential,
    /// The HMAC signature does not match the shared secret.
    #[error("invalid signature")]
    InvalidSignature,
    /// The `exp` claim is in the past.
    #[error("expired")]
    Expired,
    /// The `nbf` claim is in the future.
    #[error("not yet valid")]
    NotYetValid,
}

impl AuthError {
    /// Machine-readable code used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoCredentialPresent => "no_credential",
            AuthError::MalformedCredential => "malformed_credential",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "expired",
            AuthError::NotYetValid => "not_yet_valid",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ErrorEnvelope::new(self.to_string()).with_status(self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn expired_returns_401_with_category() {
        let response = AuthError::Expired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"message":"expired"}"#);
    }

    #[tokio::test]
    async fn invalid_signature_does_not_leak_details() {
        let response = AuthError::InvalidSignature.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["message"], "invalid signature");
    }

    #[test]
    fn every_category_has_a_distinct_code() {
        let all = [
            AuthError::NoCredentialPresent,
            AuthError::MalformedCredential,
            AuthError::InvalidSignature,
            AuthError::Expired,
            AuthError::NotYetValid,
        ];
        let mut codes: Vec<_> = all.iter().map(AuthError::error_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
