// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token claims and the caller identity derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::AuthError;

/// Raw claims carried by an access token.
///
/// Registered claims follow RFC 7519; `uid` is the numeric user id issued by
/// the identity service. Older tokens only carry the id in `sub`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Numeric user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,

    /// Subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

/// Verified identifier of the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity(i64);

impl CallerIdentity {
    pub fn new(user_id: i64) -> Self {
        Self(user_id)
    }

    pub fn user_id(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Claims of a credential whose signature and expiry have been checked.
///
/// Only [`ClaimVerifier`](super::ClaimVerifier) constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub identity: CallerIdentity,
    pub subject: Option<String>,
    pub issuer: Option<String>,
    pub expires_at: i64,
}

impl VerifiedClaims {
    pub(super) fn from_claims(claims: AccessTokenClaims) -> Result<Self, AuthError> {
        let user_id = match (claims.uid, claims.sub.as_deref()) {
            (Some(uid), _) => uid,
            (None, Some(sub)) => sub
                .parse::<i64>()
                .map_err(|_| AuthError::MalformedCredential)?,
            (None, None) => return Err(AuthError::MalformedCredential),
        };

        Ok(Self {
            identity: CallerIdentity::new(user_id),
            subject: claims.sub,
            issuer: claims.iss,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> AccessTokenClaims {
        AccessTokenClaims {
            uid: Some(42),
            sub: Some("42".to_string()),
            iss: Some("scriptum-sso".to_string()),
            exp: 1_700_003_600,
            iat: Some(1_700_000_000),
            nbf: None,
        }
    }

    #[test]
    fn identity_comes_from_uid() {
        let verified = VerifiedClaims::from_claims(sample_claims()).unwrap();
        assert_eq!(verified.identity, CallerIdentity::new(42));
        assert_eq!(verified.issuer.as_deref(), Some("scriptum-sso"));
        assert_eq!(verified.expires_at, 1_700_003_600);
    }

    #[test]
    fn identity_falls_back_to_numeric_subject() {
        let mut claims = sample_claims();
        claims.uid = None;
        claims.sub = Some("1337".to_string());
        let verified = VerifiedClaims::from_claims(claims).unwrap();
        assert_eq!(verified.identity.user_id(), 1337);
    }

    #[test]
    fn non_numeric_subject_without_uid_is_malformed() {
        let mut claims = sample_claims();
        claims.uid = None;
        claims.sub = Some("user_abc".to_string());
        assert_eq!(
            VerifiedClaims::from_claims(claims),
            Err(AuthError::MalformedCredential)
        );
    }

    #[test]
    fn identity_displays_as_decimal() {
        assert_eq!(CallerIdentity::new(-7).to_string(), "-7");
        assert_eq!(CallerIdentity::new(9001).to_string(), "9001");
    }
}
