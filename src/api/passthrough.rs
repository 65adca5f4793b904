// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Glue for REST routes that map one-to-one onto unary RPCs.
//!
//! Route handlers generated from the service definitions only decode the
//! request and pick the client method; identity propagation, error
//! translation and JSON rendering happen here:
//!
//! ```rust,ignore
//! pub async fn get_box(
//!     State(client): State<BoxesClient<Channel>>,
//!     ctx: RequestContext,
//!     Path(id): Path<String>,
//! ) -> Result<Json<Box>, GatewayError> {
//!     let mut client = client.clone();
//!     forward(&ctx, GetBoxRequest { id }, |req| async move { client.get_box(req).await }).await
//! }
//! ```

use std::future::Future;

use axum::Json;
use serde::Serialize;
use tonic::Status;

use crate::auth::RequestContext;
use crate::error::GatewayError;
use crate::grpc::propagation::request_with_identity;

/// Run one unary call on behalf of the caller in `ctx`.
///
/// The call carries `x-user-id` when the caller is authenticated. A failed
/// call becomes [`GatewayError::Backend`], which renders through the status
/// translator.
pub async fn forward<Req, Resp, Call, Fut>(
    ctx: &RequestContext,
    message: Req,
    call: Call,
) -> Result<Json<Resp>, GatewayError>
where
    Call: FnOnce(tonic::Request<Req>) -> Fut,
    Fut: Future<Output = Result<tonic::Response<Resp>, Status>>,
    Resp: Serialize,
{
    let request = request_with_identity(ctx, message);
    match call(request).await {
        Ok(response) => Ok(Json(response.into_inner())),
        Err(status) => {
            tracing::warn!(code = ?status.code(), message = status.message(), "Backend call failed");
            Err(GatewayError::Backend(status))
        }
    }
}
