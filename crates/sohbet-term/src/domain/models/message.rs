#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
use serde::Deserialize;
use serde::Serialize;

use super::ModelName;
use super::Role;

pub const FALLBACK_REPLY: &str = "Üzgünüm, bir hata oluştu.";
pub const UPLOAD_SUCCESS: &str = "Doküman başarıyla yüklendi ve indekslendi. Artık doküman içeriği hakkında sorular sorabilirsiniz.";
pub const UPLOAD_FAILURE: &str = "Doküman yüklenirken bir hata oluştu.";

/// One reasoning step reported by the backend alongside a reply.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default, Debug)]
pub struct Thought {
    pub step: String,
    pub thought: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default, Debug)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_context: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thoughts: Option<Vec<Thought>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelName>,
}

impl Message {
    pub fn user(content: &str) -> Message {
        return Message {
            role: Role::User,
            content: content.to_string(),
            ..Default::default()
        };
    }

    pub fn assistant(content: &str, has_context: bool) -> Message {
        return Message {
            role: Role::Assistant,
            content: content.to_string(),
            has_context: Some(has_context),
            ..Default::default()
        };
    }

    /// The fixed reply shown when a chat request fails.
    pub fn fallback() -> Message {
        return Message::assistant(FALLBACK_REPLY, false);
    }

    pub fn upload_succeeded() -> Message {
        return Message::assistant(UPLOAD_SUCCESS, false);
    }

    pub fn upload_failed() -> Message {
        return Message::assistant(UPLOAD_FAILURE, false);
    }

    pub fn is_user(&self) -> bool {
        return self.role == Role::User;
    }

    pub fn is_assistant(&self) -> bool {
        return self.role == Role::Assistant;
    }

    pub fn used_context(&self) -> bool {
        return self.has_context.unwrap_or(false);
    }
}
