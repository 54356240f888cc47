//! The injected HTTP collaborator and its bundled reqwest adapter.
//!
//! # Design
//! The access layer never owns a socket. It hands each built request to a
//! [`Transport`], which executes the round trip and returns the response as
//! plain data. The trait exposes exactly the two verbs the store protocol
//! uses. `ReqwestTransport` is the stock implementation; tests and embedders
//! can substitute their own. Round-trip logging lives here, at the I/O
//! boundary — the operations themselves stay silent.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::HttpResponse;

/// An injected HTTP client capable of GET and POST with custom headers.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, TransportError>;

    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Option<String>,
    ) -> Result<HttpResponse, TransportError>;
}

/// Stock [`Transport`] backed by a pooled [`reqwest::Client`].
///
/// Applies no retries, timeouts, or redirects beyond reqwest's defaults;
/// every failure maps to a single [`TransportError`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        into_plain_response("GET", url, response).await
    }

    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Option<String>,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        into_plain_response("POST", url, response).await
    }
}

async fn into_plain_response(
    method: &str,
    url: &str,
    response: reqwest::Response,
) -> Result<HttpResponse, TransportError> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response
        .text()
        .await
        .map_err(|e| TransportError(e.to_string()))?;
    log::debug!("{method} {url} -> {status}");
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
