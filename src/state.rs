// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::ClaimVerifier;
use crate::config::Upstreams;
use crate::upload::UploadBridge;

/// Read-only state shared by all request tasks.
pub struct AppState<B> {
    pub verifier: Arc<ClaimVerifier>,
    pub uploads: Arc<UploadBridge<B>>,
    pub upstreams: Arc<Upstreams>,
}

impl<B> AppState<B> {
    pub fn new(verifier: ClaimVerifier, uploads: UploadBridge<B>, upstreams: Upstreams) -> Self {
        Self {
            verifier: Arc::new(verifier),
            uploads: Arc::new(uploads),
            upstreams: Arc::new(upstreams),
        }
    }
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            verifier: self.verifier.clone(),
            uploads: self.uploads.clone(),
            upstreams: self.upstreams.clone(),
        }
    }
}
