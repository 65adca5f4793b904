// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request context carrying the optional caller identity.
//!
//! The authentication gate stores a [`RequestContext`] in the request
//! extensions for every request it forwards. Handlers take it as an extractor:
//!
//! ```rust,ignore
//! async fn handler(ctx: RequestContext) -> impl IntoResponse {
//!     match ctx.caller() {
//!         Some(identity) => { /* authenticated */ }
//!         None => { /* anonymous */ }
//!     }
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::CallerIdentity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    caller: Option<CallerIdentity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { caller: None }
    }

    pub fn authenticated(identity: CallerIdentity) -> Self {
        Self {
            caller: Some(identity),
        }
    }

    /// Identity attached by the authentication gate, if any.
    pub fn caller(&self) -> Option<CallerIdentity> {
        self.caller
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A request that never went through the gate is anonymous.
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .copied()
            .unwrap_or_default())
    }
}
