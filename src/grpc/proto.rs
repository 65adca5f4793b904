// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Messages and client for `api.v2.FileService`, generated from
//! `proto/api/v2/files.proto` by `build.rs`.

use prost::bytes::Bytes;

pub mod v2 {
    tonic::include_proto!("api.v2");
}

pub use v2::file_service_client::FileServiceClient;
pub use v2::{file_upload_request, FileMeta, FileUploadRequest, FileUploadResponse};

impl FileUploadRequest {
    pub fn meta(name: impl Into<String>) -> Self {
        Self {
            body: Some(file_upload_request::Body::Meta(FileMeta { name: name.into() })),
        }
    }

    pub fn chunk(bytes: Bytes) -> Self {
        Self {
            body: Some(file_upload_request::Body::Chunk(bytes)),
        }
    }
}
