use crate::error::TransportError;
use crate::record::{LogEntry, SourceInfo};
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;

const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP transport talking to the ingestion service.
///
/// - `GET {base_url}/validate` resolves the client's [`SourceInfo`].
/// - `POST {base_url}/logs` ships a batch as `{"logs": [...]}`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    /// Service root, e.g. "https://logs.example.com".
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct IngestBody<'a> {
    logs: &'a [LogEntry],
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        HttpTransport {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

async fn ensure_success(resp: Response) -> Result<Response, TransportError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
        Err(TransportError::Status { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn validate(&self) -> Result<SourceInfo, TransportError> {
        let resp = self
            .client
            .get(self.endpoint("validate"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let bytes = ensure_success(resp).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn ship(&self, batch: &[LogEntry]) -> Result<(), TransportError> {
        let body = serde_json::to_vec(&IngestBody { logs: batch })?;

        let resp = self
            .client
            .post(self.endpoint("logs"))
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }
}
