// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication for the gateway.
//!
//! ## Auth Flow
//!
//! 1. The client sends `Authorization: Bearer <JWT>` (or `?jwtToken=<JWT>`
//!    where headers cannot be set)
//! 2. The gate verifies the HMAC signature with the shared secret, then
//!    `exp` / `nbf` against the current time
//! 3. The `uid` claim becomes the [`CallerIdentity`] stored in the request's
//!    [`RequestContext`]
//! 4. Outbound gRPC calls carry it as `x-user-id` metadata
//!    (see [`crate::grpc::propagation`])
//!
//! ## Security
//!
//! - Requests without a credential are anonymous; backends decide access
//! - Invalid credentials are rejected with a fixed category message

pub mod claims;
pub mod context;
pub mod error;
pub mod middleware;
pub mod verifier;

pub use claims::{CallerIdentity, VerifiedClaims};
pub use context::RequestContext;
pub use error::AuthError;
pub use middleware::authenticate;
pub use verifier::ClaimVerifier;
