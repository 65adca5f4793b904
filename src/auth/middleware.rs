// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate.
//!
//! Runs in front of every route. A request without a credential is forwarded
//! as anonymous; route-level authorization belongs to the backends. A request
//! with a credential that fails verification is answered with 401 and never
//! reaches the next layer.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/v2/files", post(upload_file))
//!     .layer(axum::middleware::from_fn_with_state(
//!         Arc::new(ClaimVerifier::new(secret)),
//!         authenticate,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{ClaimVerifier, RequestContext};

/// Query parameter consulted when no bearer header is present.
pub const TOKEN_QUERY_PARAM: &str = "jwtToken";

const BEARER_PREFIX: &str = "bearer ";

/// Authentication middleware function.
pub async fn authenticate(
    State(verifier): State<Arc<ClaimVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = match extract_credential(request.headers(), request.uri()) {
        None => RequestContext::anonymous(),
        Some(token) => match verifier.verify(&token) {
            Ok(claims) => RequestContext::authenticated(claims.identity),
            Err(e) => {
                tracing::info!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    error_code = e.error_code(),
                    "Rejected request credential"
                );
                return e.into_response();
            }
        },
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Find the credential in the `Authorization` header, then in the query string.
pub fn extract_credential(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    bearer_from_headers(headers).or_else(|| token_from_query(uri))
}

fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    if value.len() <= BEARER_PREFIX.len()
        || !value.is_char_boundary(BEARER_PREFIX.len())
        || !value[..BEARER_PREFIX.len()].eq_ignore_ascii_case(BEARER_PREFIX)
    {
        return None;
    }
    non_empty(value[BEARER_PREFIX.len()..].trim())
}

/// First non-empty `jwtToken` value. Repeated parameters still count as a
/// credential, so `?jwtToken=a&jwtToken=b` is verified rather than ignored.
fn token_from_query(uri: &Uri) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    pairs
        .into_iter()
        .find(|(key, value)| key == TOKEN_QUERY_PARAM && !value.is_empty())
        .map(|(_, token)| token)
}

fn non_empty(token: &str) -> Option<String> {
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::tests::{expired_token, fresh_token, sign, SECRET};
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|ctx: RequestContext| async move {
                    ctx.caller()
                        .map(|identity| identity.to_string())
                        .unwrap_or_else(|| "anonymous".to_string())
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                Arc::new(ClaimVerifier::new(SECRET)),
                authenticate,
            ))
    }

    async fn call(request: axum::http::Request<Body>) -> (StatusCode, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get_request(uri: &str) -> axum::http::request::Builder {
        axum::http::Request::builder().uri(uri)
    }

    #[tokio::test]
    async fn bearer_header_attaches_identity() {
        let request = get_request("/whoami")
            .header(AUTHORIZATION, format!("Bearer {}", fresh_token(42)))
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(request).await, (StatusCode::OK, "42".to_string()));
    }

    #[tokio::test]
    async fn query_parameter_is_a_fallback() {
        let uri = format!("/whoami?{}={}", TOKEN_QUERY_PARAM, fresh_token(9));
        let request = get_request(&uri).body(Body::empty()).unwrap();
        assert_eq!(call(request).await, (StatusCode::OK, "9".to_string()));
    }

    #[tokio::test]
    async fn header_wins_over_query_parameter() {
        let uri = format!("/whoami?jwtToken={}", fresh_token(2));
        let request = get_request(&uri)
            .header(AUTHORIZATION, format!("bearer {}", fresh_token(1)))
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(request).await, (StatusCode::OK, "1".to_string()));
    }

    #[tokio::test]
    async fn missing_credential_is_anonymous() {
        let request = get_request("/whoami").body(Body::empty()).unwrap();
        assert_eq!(call(request).await, (StatusCode::OK, "anonymous".to_string()));
    }

    #[tokio::test]
    async fn non_bearer_header_is_ignored() {
        let request = get_request("/whoami")
            .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(request).await, (StatusCode::OK, "anonymous".to_string()));
    }

    #[tokio::test]
    async fn expired_credential_is_rejected_without_forwarding() {
        let request = get_request("/whoami")
            .header(AUTHORIZATION, format!("Bearer {}", expired_token(42)))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"expired"}"#);
    }

    #[tokio::test]
    async fn mis_signed_credential_is_rejected() {
        let exp = chrono::Utc::now().timestamp() + 60;
        let token = sign(&serde_json::json!({ "uid": 1, "exp": exp }), "wrong-secret");
        let request = get_request("/whoami")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"invalid signature"}"#);
    }

    #[tokio::test]
    async fn malformed_query_credential_is_rejected() {
        let request = get_request("/whoami?jwtToken=garbage")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"malformed"}"#);
    }

    #[tokio::test]
    async fn repeated_query_credential_is_still_verified() {
        let request = get_request("/whoami?jwtToken=forged.token.here&jwtToken=forged.token.here")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"message":"malformed"}"#);
    }

    #[tokio::test]
    async fn repeated_query_parameter_uses_the_first_token() {
        let uri = format!("/whoami?jwtToken={}&jwtToken=other", fresh_token(5));
        let request = get_request(&uri).body(Body::empty()).unwrap();
        assert_eq!(call(request).await, (StatusCode::OK, "5".to_string()));
    }

    #[test]
    fn empty_query_value_does_not_hide_a_later_one() {
        let uri: Uri = "/?jwtToken=&jwtToken=second".parse().unwrap();
        assert_eq!(
            extract_credential(&HeaderMap::new(), &uri).as_deref(),
            Some("second")
        );
    }

    #[test]
    fn extract_credential_trims_prefix_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "BEARER abc.def.ghi".parse().unwrap());
        let uri: Uri = "/".parse().unwrap();
        assert_eq!(
            extract_credential(&headers, &uri).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn empty_bearer_falls_through_to_query() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        let uri: Uri = "/?jwtToken=from-query".parse().unwrap();
        assert_eq!(
            extract_credential(&headers, &uri).as_deref(),
            Some("from-query")
        );
    }
}
