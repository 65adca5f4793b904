// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HMAC access token verification.
//!
//! Signature checking is delegated to `jsonwebtoken`; time-based checks are
//! done here against an explicit clock value so that verification stays a
//! pure function of `(token, secret, now)`.

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use super::claims::{AccessTokenClaims, VerifiedClaims};
use super::AuthError;

/// Verifies bearer credentials against the process-wide signing secret.
///
/// The secret is fixed at construction. The verifier is shared read-only by
/// all request tasks.
#[derive(Clone)]
pub struct ClaimVerifier {
    key: DecodingKey,
    validation: Validation,
    leeway: i64,
}

impl ClaimVerifier {
    /// Create a verifier for tokens signed with `secret` (HS256/384/512).
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
            leeway: 0,
        }
    }

    /// Accept `exp`/`nbf` values that are off by up to `seconds`.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = i64::try_from(seconds).unwrap_or(i64::MAX);
        self
    }

    /// Verify `token` against the current wall clock.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify `token` as of the unix timestamp `now`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::NoCredentialPresent);
        }

        let token_data = decode::<AccessTokenClaims>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::MalformedCredential,
            })?;

        let claims = token_data.claims;

        // A token is dead from its `exp` second onward.
        if claims.exp <= now.saturating_sub(self.leeway) {
            return Err(AuthError::Expired);
        }
        if let Some(nbf) = claims.nbf {
            if nbf > now.saturating_add(self.leeway) {
                return Err(AuthError::NotYetValid);
            }
        }

        VerifiedClaims::from_claims(claims)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::auth::CallerIdentity;

    pub(crate) const SECRET: &str = "test-signing-secret";
    const NOW: i64 = 1_700_000_000;

    pub(crate) fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    /// Token for `uid` that stays valid for an hour of wall-clock time.
    pub(crate) fn fresh_token(uid: i64) -> String {
        let exp = Utc::now().timestamp() + 3600;
        sign(&serde_json::json!({ "uid": uid, "exp": exp }), SECRET)
    }

    /// Token for `uid` that expired a minute ago.
    pub(crate) fn expired_token(uid: i64) -> String {
        let exp = Utc::now().timestamp() - 60;
        sign(&serde_json::json!({ "uid": uid, "exp": exp }), SECRET)
    }

    #[test]
    fn valid_token_yields_identity() {
        let token = sign(
            &serde_json::json!({ "uid": 42, "sub": "42", "iss": "sso", "exp": NOW + 60 }),
            SECRET,
        );
        let claims = ClaimVerifier::new(SECRET).verify_at(&token, NOW).unwrap();
        assert_eq!(claims.identity, CallerIdentity::new(42));
        assert_eq!(claims.issuer.as_deref(), Some("sso"));
        assert_eq!(claims.expires_at, NOW + 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign(&serde_json::json!({ "uid": 1, "exp": NOW - 1 }), SECRET);
        let result = ClaimVerifier::new(SECRET).verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::Expired));
    }

    #[test]
    fn token_expiring_this_second_is_rejected() {
        let token = sign(&serde_json::json!({ "uid": 1, "exp": NOW }), SECRET);
        let result = ClaimVerifier::new(SECRET).verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::Expired));

        let token = sign(&serde_json::json!({ "uid": 1, "exp": NOW + 1 }), SECRET);
        assert!(ClaimVerifier::new(SECRET).verify_at(&token, NOW).is_ok());
    }

    #[test]
    fn leeway_tolerates_small_clock_skew() {
        let token = sign(&serde_json::json!({ "uid": 1, "exp": NOW - 30 }), SECRET);
        let verifier = ClaimVerifier::new(SECRET).with_leeway(60);
        assert!(verifier.verify_at(&token, NOW).is_ok());
    }

    #[test]
    fn token_used_before_nbf_is_rejected() {
        let token = sign(
            &serde_json::json!({ "uid": 1, "exp": NOW + 600, "nbf": NOW + 300 }),
            SECRET,
        );
        let result = ClaimVerifier::new(SECRET).verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::NotYetValid));
    }

    #[test]
    fn wrong_secret_is_an_invalid_signature() {
        let token = sign(&serde_json::json!({ "uid": 1, "exp": NOW + 60 }), "other-secret");
        let result = ClaimVerifier::new(SECRET).verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_is_an_invalid_signature() {
        let token = sign(&serde_json::json!({ "uid": 1, "exp": NOW + 60 }), SECRET);
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = URL_SAFE_NO_PAD.encode(br#"{"uid":2,"exp":1700000060}"#);
        let forged = parts.join(".");

        let result = ClaimVerifier::new(SECRET).verify_at(&forged, NOW);
        assert_eq!(result, Err(AuthError::InvalidSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let result = ClaimVerifier::new(SECRET).verify_at("not-a-jwt", NOW);
        assert_eq!(result, Err(AuthError::MalformedCredential));
    }

    #[test]
    fn token_without_exp_is_malformed() {
        let token = sign(&serde_json::json!({ "uid": 1 }), SECRET);
        let result = ClaimVerifier::new(SECRET).verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::MalformedCredential));
    }

    #[test]
    fn token_without_identity_is_malformed() {
        let token = sign(&serde_json::json!({ "iss": "sso", "exp": NOW + 60 }), SECRET);
        let result = ClaimVerifier::new(SECRET).verify_at(&token, NOW);
        assert_eq!(result, Err(AuthError::MalformedCredential));
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let result = ClaimVerifier::new(SECRET).verify_at("", NOW);
        assert_eq!(result, Err(AuthError::NoCredentialPresent));
    }

    #[test]
    fn verification_is_deterministic() {
        let verifier = ClaimVerifier::new(SECRET);
        let token = sign(&serde_json::json!({ "uid": 5, "exp": NOW + 60 }), SECRET);
        assert_eq!(verifier.verify_at(&token, NOW), verifier.verify_at(&token, NOW));
    }
}
