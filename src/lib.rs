// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scriptum Gateway - REST to gRPC edge gateway
//!
//! Authenticates HTTP callers with HMAC-signed JWTs, propagates their
//! identity to backend gRPC services, and streams multipart uploads into the
//! file service's client-streaming `Upload` call.
//!
//! ## Modules
//!
//! - `api` - HTTP routes, interceptor chain and OpenAPI document (Axum)
//! - `auth` - credential extraction, verification and the request context
//! - `grpc` - file service client, identity metadata, status translation
//! - `upload` - the streaming upload bridge
//! - `config` / `logging` / `tls` - process setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod grpc;
pub mod logging;
pub mod state;
pub mod tls;
pub mod upload;
