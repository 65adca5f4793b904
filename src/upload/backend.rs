// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound side of the upload bridge.
//!
//! The bridge only needs three operations from the file service: open a
//! client stream, push messages into it, half-close and wait for the single
//! response. [`crate::grpc::file_service::GrpcFileBackend`] implements them
//! on a tonic channel.

use std::future::Future;
use std::time::Duration;

use tonic::{metadata::MetadataMap, Status};

use crate::grpc::proto::{FileUploadRequest, FileUploadResponse};

/// An open client-streaming upload call.
///
/// Dropping a sink without calling [`close_and_recv`](UploadSink::close_and_recv)
/// must cancel the call.
pub trait UploadSink: Send {
    /// Send one message, waiting while the outbound buffer is full.
    fn send(
        &mut self,
        message: FileUploadRequest,
    ) -> impl Future<Output = Result<(), Status>> + Send;

    /// Signal end of stream and wait for the terminal response.
    fn close_and_recv(self) -> impl Future<Output = Result<FileUploadResponse, Status>> + Send;
}

/// Opens upload calls against the file service.
pub trait UploadBackend: Send + Sync + 'static {
    type Sink: UploadSink;

    /// Open a new upload carrying `metadata`.
    ///
    /// `timeout` is the remaining budget for the whole call and is forwarded
    /// to the backend as the call deadline.
    fn open(
        &self,
        metadata: MetadataMap,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Sink, Status>> + Send;
}
