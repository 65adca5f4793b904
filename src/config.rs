// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup into an
//! immutable [`GatewayConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `API_PREFIX` | Path prefix of the gateway routes | `/api` |
//! | `JWT_SECRET` | HMAC secret shared with the token issuer | Required |
//! | `FILE_SERVICE_ADDR` | File service gRPC address | Required |
//! | `UPLOAD_TIMEOUT_SECS` | Deadline of one upload stream | `5` |
//! | `LOG_LEVEL` | Default log level when `RUST_LOG` is unset | `info` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files enabling HTTPS | Unset |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const API_PREFIX_ENV: &str = "API_PREFIX";

/// Shared HMAC secret. Must be identical to the one the token issuer signs
/// with.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

pub const FILE_SERVICE_ADDR_ENV: &str = "FILE_SERVICE_ADDR";

/// Whole-stream deadline of an upload, in seconds.
///
/// # Default
/// `5`
pub const UPLOAD_TIMEOUT_SECS_ENV: &str = "UPLOAD_TIMEOUT_SECS";

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_API_PREFIX: &str = "/api";
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Upstream gRPC services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstreams {
    pub files: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
    pub api_prefix: String,
    pub jwt_secret: String,
    pub upstreams: Upstreams,
    pub upload_timeout: Duration,
    pub log_level: String,
    pub log_format: LogFormat,
    pub tls: Option<TlsPaths>,
}

// The secret never ends up in logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("listen_addr", &self.listen_addr)
            .field("api_prefix", &self.api_prefix)
            .field("jwt_secret", &"<redacted>")
            .field("upstreams", &self.upstreams)
            .field("upload_timeout", &self.upload_timeout)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("tls", &self.tls)
            .finish()
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => parse(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };
        let listen_addr = parse_listen_addr(&host, port)?;

        let api_prefix = normalize_prefix(
            &get(API_PREFIX_ENV).unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
        );

        let upload_timeout_secs = match get(UPLOAD_TIMEOUT_SECS_ENV) {
            Some(raw) => parse(UPLOAD_TIMEOUT_SECS_ENV, &raw)?,
            None => DEFAULT_UPLOAD_TIMEOUT_SECS,
        };
        if upload_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: UPLOAD_TIMEOUT_SECS_ENV,
                value: "0".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                value: raw,
                reason,
            })?,
            None => LogFormat::default(),
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        Ok(Self {
            listen_addr,
            api_prefix,
            jwt_secret: require(JWT_SECRET_ENV)?,
            upstreams: Upstreams {
                files: require(FILE_SERVICE_ADDR_ENV)?,
            },
            upload_timeout: Duration::from_secs(upload_timeout_secs),
            log_level: get(LOG_LEVEL_ENV).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
            tls,
        })
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_listen_addr(host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    let raw = if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    };
    parse(HOST_ENV, &raw)
}

/// `api/` and `/api` both become `/api`; an empty prefix stays empty.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
