// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # HTTP Surface
//!
//! Every request passes the same interceptor chain, outermost first:
//!
//! 1. request id (`x-request-id`) assigned and echoed on the response
//! 2. `tower-http` tracing span
//! 3. authentication gate ([`crate::auth::authenticate`]), which may answer 401
//! 4. request logger ([`crate::logging::request_logger`])
//!
//! and then reaches one of the routes:
//!
//! | Route | Handler |
//! |-------|---------|
//! | `POST {prefix}/v2/files` | [`files::upload_file`] |
//! | `GET /health/live`, `GET /health/ready` | [`health`] |
//! | `GET /docs` | Swagger UI |

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::authenticate,
    error::ErrorEnvelope,
    logging::request_logger,
    state::AppState,
    upload::{UploadBackend, UploadReceipt},
};

pub mod files;
pub mod health;
pub mod passthrough;

/// Build the gateway router. `api_prefix` is empty or starts with `/`.
pub fn router<B>(state: AppState<B>, api_prefix: &str) -> Router
where
    B: UploadBackend,
{
    // Uploads are streamed, so the body size is left to the file service.
    let api_routes = Router::new()
        .route(
            "/v2/files",
            post(files::upload_file::<B>).layer(DefaultBodyLimit::disable()),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state.upstreams.clone());

    let app = if api_prefix.is_empty() {
        health_routes.merge(api_routes)
    } else {
        health_routes.nest(api_prefix, api_routes)
    };

    app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.verifier.clone(),
                    authenticate,
                ))
                .layer(middleware::from_fn(request_logger)),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(files::upload_file, health::liveness, health::readiness),
    components(
        schemas(
            UploadReceipt,
            ErrorEnvelope,
            files::UploadForm,
            health::HealthResponse,
            health::ReadyResponse,
            health::UpstreamReport
        )
    ),
    tags(
        (name = "Files", description = "Streaming file uploads"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
