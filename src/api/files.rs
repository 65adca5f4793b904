// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `POST /v2/files`: multipart upload streamed to the file service.

use std::io;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use futures_util::TryStreamExt;
use tokio_util::io::StreamReader;
use utoipa::ToSchema;

use crate::{
    auth::RequestContext,
    error::GatewayError,
    state::AppState,
    upload::{UploadBackend, UploadReceipt},
};

/// Name of the multipart field holding the file.
pub const ATTACHMENT_FIELD: &str = "attachment";

/// Multipart body accepted by [`upload_file`].
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// File content; the part's filename becomes the stored file name
    #[schema(value_type = String, format = Binary)]
    attachment: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/v2/files",
    tag = "Files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadReceipt),
        (status = 400, description = "Malformed form or missing attachment", body = crate::error::ErrorEnvelope),
        (status = 401, description = "Invalid credential", body = crate::error::ErrorEnvelope),
        (status = 503, description = "File service unavailable or stream failed", body = crate::error::ErrorEnvelope)
    )
)]
pub async fn upload_file<B>(
    State(state): State<AppState<B>>,
    ctx: RequestContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadReceipt>, GatewayError>
where
    B: UploadBackend,
{
    let mut multipart = multipart.map_err(|e| GatewayError::FormParse(e.body_text()))?;

    // Parts before the attachment are skipped; the first attachment wins.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::FormParse(e.body_text()))?
    {
        if field.name() != Some(ATTACHMENT_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::MissingAttachment("field is not a file".to_string()))?;
        tracing::info!(%file_name, caller = ?ctx.caller(), "Received file upload");

        let body = StreamReader::new(Box::pin(
            field.map_err(|e| io::Error::other(e.body_text())),
        ));
        let receipt = state.uploads.upload(&ctx, &file_name, body).await?;
        return Ok(Json(receipt));
    }

    Err(GatewayError::MissingAttachment("no such file".to_string()))
}
