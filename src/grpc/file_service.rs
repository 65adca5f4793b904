// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! tonic implementation of the upload backend.
//!
//! The outbound half of the client-streaming call is a bounded channel feeding
//! a [`ReceiverStream`]; the call itself is driven on its own task so the
//! bridge can push messages while tonic is writing them. When the file
//! service stops reading, the channel fills and [`GrpcUploadSink::send`]
//! waits, which in turn stops the bridge from reading the request body.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{metadata::MetadataMap, transport::Channel, Status};

use super::proto::{FileServiceClient, FileUploadRequest, FileUploadResponse};
use crate::upload::{UploadBackend, UploadSink};

/// Messages buffered between the bridge and the transport.
const STREAM_BUFFER: usize = 4;

#[derive(Debug, Clone)]
pub struct GrpcFileBackend {
    client: FileServiceClient<Channel>,
}

impl GrpcFileBackend {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: FileServiceClient::new(channel),
        }
    }
}

impl UploadBackend for GrpcFileBackend {
    type Sink = GrpcUploadSink;

    async fn open(&self, metadata: MetadataMap, timeout: Duration) -> Result<GrpcUploadSink, Status> {
        let mut client = self.client.clone();

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let mut request = tonic::Request::new(ReceiverStream::new(rx));
        *request.metadata_mut() = metadata;
        request.set_timeout(timeout);

        let call = tokio::spawn(async move {
            client
                .upload(request)
                .await
                .map(tonic::Response::into_inner)
        });

        Ok(GrpcUploadSink {
            tx,
            call: Some(call),
        })
    }
}

/// Outbound half of an open `Upload` call.
///
/// Dropped without [`close_and_recv`](UploadSink::close_and_recv), it aborts
/// the call task, which resets the HTTP/2 stream.
pub struct GrpcUploadSink {
    tx: mpsc::Sender<FileUploadRequest>,
    call: Option<JoinHandle<Result<FileUploadResponse, Status>>>,
}

impl UploadSink for GrpcUploadSink {
    async fn send(&mut self, message: FileUploadRequest) -> Result<(), Status> {
        if self.tx.send(message).await.is_ok() {
            return Ok(());
        }

        // The receiver is gone, so the call has already ended. Report why.
        let Some(call) = self.call.take() else {
            return Err(Status::aborted("upload call already finished"));
        };
        match join(call).await {
            Ok(_) => Err(Status::internal(
                "file service responded before the upload was complete",
            )),
            Err(status) => Err(status),
        }
    }

    async fn close_and_recv(mut self) -> Result<FileUploadResponse, Status> {
        let call = self.call.take();
        // Dropping the sender ends the request stream.
        drop(self);

        match call {
            Some(call) => join(call).await,
            None => Err(Status::aborted("upload call already finished")),
        }
    }
}

impl Drop for GrpcUploadSink {
    fn drop(&mut self) {
        if let Some(call) = self.call.take() {
            call.abort();
        }
    }
}

async fn join(
    call: JoinHandle<Result<FileUploadResponse, Status>>,
) -> Result<FileUploadResponse, Status> {
    call.await
        .map_err(|e| Status::internal(format!("upload task failed: {e}")))?
}
