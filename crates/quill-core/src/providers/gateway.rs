//! HTTP client for the chat gateway.
//!
//! The gateway fronts the model API and owns conversation memory; the
//! client sends a bare prompt and consumes the reply. Two paths:
//! `/api/claude/stream` returns the response as a chunked body, and
//! `/api/claude/upload` takes a multipart form (prompt + attachments) and
//! replies in one shot.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

use super::ProviderError;

/// Raw chunk stream from an in-flight response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

#[derive(Debug, Serialize)]
struct StreamRequest<'a> {
    prompt: &'a str,
}

/// One opaque binary attachment for the upload path.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Single-shot reply from the upload path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReply {
    pub response: String,
    #[serde(default)]
    pub file: Option<String>,
}

/// Chat gateway client.
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl GatewayClient {
    /// Creates a new client for the given gateway base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Submits a prompt and returns the raw chunk stream of the reply.
    ///
    /// # Errors
    /// Returns a classified error when the request cannot be sent or the
    /// gateway answers with a non-success status. Mid-body failures
    /// surface later, as error items on the returned stream.
    pub async fn stream_prompt(&self, prompt: &str) -> Result<ByteStream, ProviderError> {
        let url = format!("{}/api/claude/stream", self.base_url);
        tracing::debug!(%url, "submitting prompt");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("accept", "text/event-stream")
            .json(&StreamRequest { prompt })
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http_status(status.as_u16(), &error_body));
        }

        Ok(Box::pin(response.bytes_stream()))
    }

    /// Sends a prompt with attachments; the reply arrives in one shot.
    ///
    /// # Errors
    /// Returns a classified error for send failures, non-success statuses,
    /// and unparseable replies.
    pub async fn upload(
        &self,
        prompt: &str,
        attachments: Vec<Attachment>,
    ) -> Result<UploadReply, ProviderError> {
        let url = format!("{}/api/claude/upload", self.base_url);
        tracing::debug!(%url, count = attachments.len(), "uploading attachments");

        let mut form = reqwest::multipart::Form::new().text("prompt", prompt.to_string());
        for attachment in attachments {
            let part = reqwest::multipart::Part::bytes(attachment.bytes).file_name(attachment.name);
            form = form.part("file", part);
        }

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http_status(status.as_u16(), &error_body));
        }

        response
            .json::<UploadReply>()
            .await
            .map_err(|e| ProviderError::parse(format!("Invalid upload reply: {e}")))
    }
}
