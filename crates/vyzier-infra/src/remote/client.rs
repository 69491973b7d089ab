//! RemoteResolver: [`ResponseResolver`] backed by the hosted chat endpoint.
//!
//! Sends one POST of `{message, history}` per user turn and expects
//! `{response}` back. Every failure is mapped onto [`NetworkError`]; the
//! session controller turns those into the fallback message.

use std::time::Duration;

use tracing::debug;

use vyzier_core::resolver::provider::ResponseResolver;
use vyzier_types::error::NetworkError;
use vyzier_types::message::Message;
use vyzier_types::wire::{ChatRequest, ChatResponse};

/// Longest error body kept in [`NetworkError::Status`], in characters.
pub const MAX_ERROR_BODY_CHARS: usize = 256;

/// Resolver that forwards each turn to a remote chat backend.
#[derive(Debug, Clone)]
pub struct RemoteResolver {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    history_limit: usize,
}

impl RemoteResolver {
    /// Build a resolver for `endpoint`.
    ///
    /// `timeout` bounds the whole request; `history_limit` caps how many prior
    /// messages go along with it.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        history_limit: usize,
    ) -> Result<Self, NetworkError> {
        let endpoint = endpoint.into();
        let parsed = reqwest::Url::parse(&endpoint)
            .map_err(|e| NetworkError::Config(format!("invalid endpoint '{endpoint}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NetworkError::Config(format!(
                "unsupported endpoint scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
            history_limit,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    fn map_send_error(&self, err: reqwest::Error) -> NetworkError {
        if err.is_timeout() {
            NetworkError::Timeout(self.timeout.as_millis() as u64)
        } else {
            NetworkError::Transport(err.to_string())
        }
    }
}

impl ResponseResolver for RemoteResolver {
    fn name(&self) -> &str {
        "remote"
    }

    async fn resolve(&self, user_text: &str, history: &[Message]) -> Result<Message, NetworkError> {
        let body = ChatRequest::new(user_text, history, self.history_limit);
        debug!(endpoint = %self.endpoint, history = body.history.len(), "Sending chat request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let reply: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout(self.timeout.as_millis() as u64)
            } else {
                NetworkError::Decode(e.to_string())
            }
        })?;

        if reply.response.trim().is_empty() {
            return Err(NetworkError::Decode("empty response".to_string()));
        }

        Ok(Message::assistant(reply.response))
    }
}

/// Cap an error body so a full HTML error page never lands in the logs.
fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
