//! HTTP client for the rover's ESP8266 firmware.
//!
//! The firmware exposes three endpoints: `POST /ejecutar` runs a command
//! payload, `GET /detener` is the emergency stop, `GET /estado` reports
//! the rover's state. A compiled program is sent as one payload,
//! `programa:<command,command,...>`, and the firmware walks the list
//! itself. Every request is bounded by the configured timeout.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use tokio::net::TcpStream;

use crate::config::RoverConfig;
use crate::log_debug;

/// Error types for talking to the rover
#[derive(thiserror::Error, Debug)]
pub enum RoverLinkError {
    #[error("Invalid rover url '{url}': expected http://<host>[:port]")]
    InvalidUrl { url: String },

    #[error("Could not connect to rover at {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    #[error("Rover did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Rover answered with status {0}")]
    Status(StatusCode),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("Request build error: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("Rover answered with malformed JSON: {0}")]
    Body(#[from] serde_json::Error),
}

/// Body of `POST /ejecutar`.
#[derive(Debug, Serialize)]
struct RoverCommand {
    comando: String,
}

/// Client for one rover. Connections are per-request; the firmware does
/// not keep sessions.
pub struct RoverLink {
    host: String,
    port: u16,
    timeout: Duration,
}

impl RoverLink {
    /// Parse a `http://<host>[:port]` base URL. Anything else, including
    /// https, is rejected.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RoverLinkError> {
        let invalid = || RoverLinkError::InvalidUrl {
            url: url.to_string(),
        };

        let rest = url.strip_prefix("http://").ok_or_else(invalid)?;
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() || rest.contains('/') {
            return Err(invalid());
        }

        let (host, port) = match rest.split_once(':') {
            Some((host, port)) => {
                let port = port.parse().map_err(|_| invalid())?;
                (host, port)
            }
            None => (rest, 80),
        };
        if host.is_empty() {
            return Err(invalid());
        }

        Ok(RoverLink {
            host: host.to_string(),
            port,
            timeout,
        })
    }

    pub fn from_config(config: &RoverConfig) -> Result<Self, RoverLinkError> {
        Self::new(&config.url, Duration::from_secs(config.timeout_secs))
    }

    /// Send a compiled command list for execution.
    pub async fn run_program(
        &self,
        commands: &[String],
    ) -> Result<serde_json::Value, RoverLinkError> {
        let payload = RoverCommand {
            comando: format!("programa:{}", commands.join(",")),
        };
        let body = serde_json::to_vec(&payload)?;
        self.request(Method::POST, "/ejecutar", Some(body)).await
    }

    /// Emergency stop.
    pub async fn stop(&self) -> Result<serde_json::Value, RoverLinkError> {
        self.request(Method::GET, "/detener", None).await
    }

    /// Ask the rover for its current state.
    pub async fn status(&self) -> Result<serde_json::Value, RoverLinkError> {
        self.request(Method::GET, "/estado", None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<serde_json::Value, RoverLinkError> {
        let addr = format!("{}:{}", self.host, self.port);

        let exchange = async {
            let stream =
                TcpStream::connect(&addr)
                    .await
                    .map_err(|e| RoverLinkError::Connect {
                        addr: addr.clone(),
                        source: e,
                    })?;
            let io = TokioIo::new(stream);
            let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

            // The connection task ends when the response is done; the
            // firmware closes after every exchange anyway.
            tokio::spawn(async move {
                if let Err(e) = conn.await {
                    log_debug!("Rover connection closed: {}", e);
                }
            });

            let mut builder = Request::builder()
                .method(method)
                .uri(path)
                .header(HOST, addr.clone());
            if body.is_some() {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            let request = builder.body(Full::new(Bytes::from(body.unwrap_or_default())))?;

            let response = sender.send_request(request).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(RoverLinkError::Status(status));
            }

            let bytes = response.collect().await?.to_bytes();
            if bytes.is_empty() {
                Ok(serde_json::Value::Null)
            } else {
                Ok(serde_json::from_slice(&bytes)?)
            }
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(RoverLinkError::Timeout(self.timeout)),
        }
    }
}
