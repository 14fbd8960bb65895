use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use std::{fmt::Debug, time::Duration};
use thiserror::Error;
use tracing::debug;

/// Time allowed to establish a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Time allowed for the whole request, response body included.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(8);

/// Status line and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// A GET that never produced a status code.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    /// The wait or the call was cancelled before it completed.
    #[error("interrupted")]
    Interrupted,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Issues a single HTTP GET. Implementations must not retry on their own.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(RESPONSE_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        let res = self.http.get(url).header(ACCEPT, "application/json").send().await?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn returns_status_and_body_for_any_status() {
        let mut server = Server::new_async().await;
        let ok = server
            .mock("GET", "/ok")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body(r#"{"fine":true}"#)
            .create_async()
            .await;
        let unavailable = server
            .mock("GET", "/down")
            .with_status(503)
            .with_body("busy")
            .create_async()
            .await;

        let transport = ReqwestTransport::new().expect("client builds");

        let reply = transport.get(&format!("{}/ok", server.url())).await.expect("reply");
        assert_eq!(reply, HttpReply { status: 200, body: r#"{"fine":true}"#.to_string() });

        let reply = transport.get(&format!("{}/down", server.url())).await.expect("reply");
        assert_eq!(reply.status, 503);
        assert_eq!(reply.body, "busy");

        ok.assert_async().await;
        unavailable.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let transport = ReqwestTransport::new().expect("client builds");

        // Port 9 (discard) on localhost is not expected to be listening.
        let err = transport.get("http://127.0.0.1:9/").await.unwrap_err();
        assert!(!matches!(err, TransportError::Interrupted));
    }
}
