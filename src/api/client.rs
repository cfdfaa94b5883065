use futures::StreamExt;
use serde_json::json;
use thiserror::Error;
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

use super::agents::{AgentInfo, AgentsResponse};
use super::events::{SseBuffer, StreamEvent};
use crate::global;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Thin client for the fund-assistant backend. Owns connection setup and
/// chunk decoding; the credential is an explicit constructor argument so the
/// chat layer stays free of ambient state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> ApiClient {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        ApiClient {
            base_url,
            token,
            http: reqwest::Client::new(),
        }
    }

    /// Reads `FUND_API_URL` and `FUND_API_TOKEN`. Meant for the process
    /// edge; everything below it takes the credential explicitly.
    pub fn from_env() -> ApiClient {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("FUND_API_URL").unwrap_or_else(|_| global::DEFAULT_API_URL.to_string());
        let token = std::env::var("FUND_API_TOKEN").ok();
        ApiClient::new(base_url, token)
    }

    pub async fn list_agents(&self) -> Result<Vec<AgentInfo>, ApiError> {
        let request = self.http.get(format!("{}/api/agents", self.base_url));
        let response = self.authorize(request).send().await?;
        let response = Self::check_status(response).await?;
        let listing: AgentsResponse = response.json().await?;
        Ok(listing.agents)
    }

    /// Opens the chat stream and forwards each decoded event over `tx`.
    ///
    /// Returns after the first terminal event, when the body ends, or when
    /// the receiver goes away. Connection failures surface as `ApiError` so
    /// the caller can fold them into the transcript.
    pub async fn stream_chat(
        &self,
        message: &str,
        agent: &str,
        tx: Sender<StreamEvent>,
    ) -> Result<(), ApiError> {
        let request = self
            .http
            .post(format!("{}/api/chat/stream", self.base_url))
            .json(&json!({ "message": message, "agent": agent }));
        let response = self.authorize(request).send().await?;
        let response = Self::check_status(response).await?;

        let mut body = response.bytes_stream();
        let mut buf = SseBuffer::new();
        let mut next_index: u64 = 0;

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for event in buf.push(&chunk) {
                if let StreamEvent::Chunk { index, .. } = &event {
                    if *index != next_index {
                        warn!(expected = next_index, got = *index, "chunk index gap");
                    }
                    next_index = *index + 1;
                }
                let terminal = event.is_terminal();
                if tx.send(event).await.is_err() {
                    debug!("stream receiver dropped, abandoning body");
                    return Ok(());
                }
                if terminal {
                    return Ok(());
                }
            }
        }
        if let Some(event) = buf.finish() {
            let _ = tx.send(event).await;
        }
        Ok(())
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:8000///", None);
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
