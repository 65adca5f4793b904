// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Streaming Uploads
//!
//! A multipart file field is forwarded to the file service as a
//! client-streaming call without being buffered in full.
//!
//! - `chunker` - fixed-size framing of the body
//! - `backend` - the outbound call as seen by the bridge
//! - `bridge` - the ordered open / meta / chunks / close sequence

pub mod backend;
pub mod bridge;
pub mod chunker;

pub use backend::{UploadBackend, UploadSink};
pub use bridge::{UploadBridge, UploadReceipt, DEFAULT_UPLOAD_TIMEOUT};
pub use chunker::{ChunkReader, CHUNK_SIZE};
