// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # gRPC Side of the Gateway
//!
//! - `proto` - generated messages and client for `api.v2.FileService`
//! - `file_service` - upload backend over a tonic channel
//! - `propagation` - caller identity as outgoing call metadata
//! - `status` - gRPC status to HTTP response translation

pub mod file_service;
pub mod propagation;
pub mod proto;
pub mod status;

use std::time::Duration;

use tonic::transport::{Channel, Endpoint, Error};

pub use file_service::GrpcFileBackend;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Build a channel to `addr` without connecting.
///
/// `addr` may omit the scheme (`files:9090`), in which case plain HTTP/2 is
/// assumed. The channel connects on first use and reconnects on failure; it
/// never retries calls.
pub fn connect_lazy(addr: &str) -> Result<Channel, Error> {
    let endpoint = Endpoint::from_shared(with_scheme(addr))?
        .connect_timeout(CONNECT_TIMEOUT)
        .http2_keep_alive_interval(KEEPALIVE_INTERVAL)
        .tcp_nodelay(true);
    Ok(endpoint.connect_lazy())
}

fn with_scheme(addr: &str) -> String {
    if addr.contains("://") {
        addr.to_string()
    } else {
        format!("http://{addr}")
    }
}
