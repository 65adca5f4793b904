// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Upstreams;

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness response listing the configured upstreams.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    pub status: String,
    pub upstreams: UpstreamReport,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpstreamReport {
    /// File service address
    pub files: String,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// The gateway holds no connections of its own that could be down (upstream
/// channels connect lazily), so it is ready once configuration is loaded.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse)
    )
)]
pub async fn readiness(State(upstreams): State<Arc<Upstreams>>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ok".to_string(),
        upstreams: UpstreamReport {
            files: upstreams.files.clone(),
        },
    })
}
