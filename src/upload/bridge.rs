// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Streaming upload bridge.
//!
//! Turns one uploaded file into one client-streaming `Upload` call:
//!
//! ```text
//! open stream ──▶ FileMeta{name} ──▶ chunk ──▶ chunk ──▶ … ──▶ half-close ──▶ response
//! ```
//!
//! The steps run strictly in order on the request's task. A single deadline,
//! started when the upload begins, bounds the whole exchange: opening the
//! stream, reading the client's body and every backend operation. A failure at
//! any step abandons the call and no partial result is reported.

use std::future::Future;
use std::time::Duration;

use prost::bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;
use tokio::time::{sleep_until, Instant};
use tonic::{Code, Status};
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::backend::{UploadBackend, UploadSink};
use super::chunker::{ChunkReader, CHUNK_SIZE};
use crate::auth::RequestContext;
use crate::error::GatewayError;
use crate::grpc::propagation::outgoing_metadata;
use crate::grpc::proto::FileUploadRequest;

/// Message tonic uses when a call's `grpc-timeout` expires locally.
const TRANSPORT_TIMEOUT_MESSAGE: &str = "Timeout expired";

/// Default budget for one upload stream.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Successful upload as reported by the file service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadReceipt {
    /// Identifier assigned by the file service
    pub file_id: String,
    /// Total stored size in bytes
    pub size: i64,
}

pub struct UploadBridge<B> {
    backend: B,
    timeout: Duration,
    chunk_size: usize,
}

impl<B> UploadBridge<B>
where
    B: UploadBackend,
{
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: DEFAULT_UPLOAD_TIMEOUT,
            chunk_size: CHUNK_SIZE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stream `source` to the file service as `file_name`.
    ///
    /// `source` is consumed and released before this returns, whatever the
    /// outcome.
    pub async fn upload<R>(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        source: R,
    ) -> Result<UploadReceipt, GatewayError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!("upload", %session_id, file_name);

        let mut source = source;
        let outcome = self
            .stream(ctx, file_name, &mut source)
            .instrument(span.clone())
            .await;
        drop(source);

        span.in_scope(|| match &outcome {
            Ok(receipt) => tracing::info!(
                file_id = %receipt.file_id,
                size = receipt.size,
                "Upload stored"
            ),
            Err(e) => tracing::error!(error = %e, "Upload failed"),
        });
        outcome
    }

    async fn stream<R>(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        source: &mut R,
    ) -> Result<UploadReceipt, GatewayError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let budget = self.timeout;
        let deadline = Instant::now() + budget;

        // One deadline for the whole call, source reads included.
        within(deadline, budget, async {
            let mut session =
                UploadSession::<B::Sink>::open(&self.backend, ctx, file_name, budget).await?;
            session.send_meta().await?;

            let mut chunks = ChunkReader::new(source, self.chunk_size);
            while let Some(chunk) = chunks.next_chunk().await.map_err(GatewayError::SourceRead)? {
                session.send_chunk(chunk).await?;
            }

            session.finish().await
        })
        .await
    }
}

/// State of one in-flight upload.
///
/// Owns the outbound stream; dropping the session before
/// [`finish`](UploadSession::finish) cancels the backend call.
struct UploadSession<S> {
    sink: S,
    file_name: String,
    bytes_sent: u64,
    chunks_sent: u64,
    budget: Duration,
}

impl<S> UploadSession<S>
where
    S: UploadSink,
{
    async fn open<B>(
        backend: &B,
        ctx: &RequestContext,
        file_name: &str,
        budget: Duration,
    ) -> Result<Self, GatewayError>
    where
        B: UploadBackend<Sink = S>,
    {
        let sink = backend
            .open(outgoing_metadata(ctx), budget)
            .await
            .map_err(|status| stream_error(status, budget, GatewayError::StreamOpen))?;
        tracing::debug!("Upload stream opened");

        Ok(Self {
            sink,
            file_name: file_name.to_string(),
            bytes_sent: 0,
            chunks_sent: 0,
            budget,
        })
    }

    async fn send_meta(&mut self) -> Result<(), GatewayError> {
        let message = FileUploadRequest::meta(self.file_name.clone());
        self.sink
            .send(message)
            .await
            .map_err(|status| stream_error(status, self.budget, GatewayError::MetaSend))
    }

    async fn send_chunk(&mut self, chunk: Bytes) -> Result<(), GatewayError> {
        let len = chunk.len() as u64;
        self.sink
            .send(FileUploadRequest::chunk(chunk))
            .await
            .map_err(|status| stream_error(status, self.budget, GatewayError::ChunkSend))?;

        self.bytes_sent += len;
        self.chunks_sent += 1;
        Ok(())
    }

    async fn finish(self) -> Result<UploadReceipt, GatewayError> {
        let (bytes_sent, chunks_sent, budget) = (self.bytes_sent, self.chunks_sent, self.budget);

        let response = self
            .sink
            .close_and_recv()
            .await
            .map_err(|status| stream_error(status, budget, GatewayError::StreamClose))?;

        tracing::debug!(bytes_sent, chunks_sent, "Upload stream closed");
        if u64::try_from(response.size).ok() != Some(bytes_sent) {
            tracing::warn!(
                bytes_sent,
                stored = response.size,
                "File service reported a different size than was sent"
            );
        }

        Ok(UploadReceipt {
            file_id: response.file_id,
            size: response.size,
        })
    }
}

/// Run `fut` to completion unless `deadline` passes first.
///
/// The timer is checked before `fut` on every wake-up, so work that becomes
/// ready after the deadline is not completed.
async fn within<F, T>(deadline: Instant, budget: Duration, fut: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    tokio::select! {
        biased;
        _ = sleep_until(deadline) => Err(GatewayError::DeadlineExceeded(budget)),
        outcome = fut => outcome,
    }
}

/// Classify a failed step, folding backend and transport timeouts into
/// [`GatewayError::DeadlineExceeded`].
fn stream_error(status: Status, budget: Duration, step: fn(Status) -> GatewayError) -> GatewayError {
    if is_deadline(&status) {
        GatewayError::DeadlineExceeded(budget)
    } else {
        step(status)
    }
}

/// `DEADLINE_EXCEEDED` from the file service, or tonic's own `grpc-timeout`
/// expiring on the client side.
fn is_deadline(status: &Status) -> bool {
    match status.code() {
        Code::DeadlineExceeded => true,
        Code::Cancelled => status.message() == TRANSPORT_TIMEOUT_MESSAGE,
        _ => false,
    }
}
