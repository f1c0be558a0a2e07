use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::ClientError;
use super::Thought;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub use_context: bool,
    #[serde(rename = "useAkilliAnaliz")]
    pub use_deep_analysis: bool,
    pub search_query: Option<String>,
    pub model: String,
}

/// Successful body of `POST /api/chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub has_context: bool,
    #[serde(default)]
    pub thoughts: Option<Vec<Thought>>,
    #[serde(default)]
    pub search_results: Option<String>,
}

/// A document handed to `POST /api/upload` as the single `file` part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one chat request. Returns [`ClientError::Cancelled`] once
    /// `cancel` fires, whether or not the server already answered.
    async fn send_chat(
        &self,
        request: ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatReply, ClientError>;

    async fn upload_document(&self, document: DocumentUpload) -> Result<(), ClientError>;
}

pub type ChatBackendBox = Box<dyn ChatBackend>;
