#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use async_trait::async_trait;
use reqwest::multipart;
use tokio_util::sync::CancellationToken;

use crate::configuration::{Config, ConfigKey};
use crate::domain::models::{ChatBackend, ChatReply, ChatRequest, ClientError, DocumentUpload};

/// Client for the chat backend's `/api/chat` and `/api/upload` endpoints.
pub struct HttpBackend {
    chat_url: String,
    upload_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(chat_url: &str, upload_url: &str) -> HttpBackend {
        HttpBackend {
            chat_url: chat_url.trim_end_matches('/').to_string(),
            upload_url: upload_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> HttpBackend {
        HttpBackend::new(
            &config.get(ConfigKey::ChatUrl),
            &config.get(ConfigKey::UploadUrl),
        )
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        let url = format!("{}/api/chat", self.chat_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), url = %url, "chat request rejected");
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let reply = serde_json::from_slice::<ChatReply>(&body)?;

        Ok(reply)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(
        &self,
        request: ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatReply, ClientError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("chat request aborted");
                Err(ClientError::Cancelled)
            }
            res = self.post_chat(&request) => res,
        }
    }

    async fn upload_document(&self, document: DocumentUpload) -> Result<(), ClientError> {
        if document.file_name.is_empty() {
            return Err(ClientError::InvalidRequest(
                "document has no file name".to_string(),
            ));
        }

        let url = format!("{}/api/upload", self.upload_url);
        let part = multipart::Part::bytes(document.bytes).file_name(document.file_name.clone());
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::error!(status = status.as_u16(), body = %body, file = %document.file_name, "upload rejected");
            return Err(ClientError::Status(status.as_u16()));
        }

        tracing::info!(file = %document.file_name, "document indexed");
        Ok(())
    }
}
