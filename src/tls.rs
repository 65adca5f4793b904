// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTPS listener support.
//!
//! TLS is optional: it is enabled when both `TLS_CERT_PATH` and
//! `TLS_KEY_PATH` are configured, otherwise the gateway serves plain HTTP
//! (typically behind a terminating load balancer).

use std::io;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsPaths;

/// Install the ring crypto provider for rustls.
///
/// Must run before any TLS configuration is built. Installing twice is
/// harmless.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

/// Load the PEM certificate chain and private key.
pub async fn load_tls_config(paths: &TlsPaths) -> io::Result<RustlsConfig> {
    for (what, path) in [("certificate", &paths.cert), ("private key", &paths.key)] {
        if !path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{what} file not found: {}", path.display()),
            ));
        }
    }

    RustlsConfig::from_pem_file(&paths.cert, &paths.key).await
}
