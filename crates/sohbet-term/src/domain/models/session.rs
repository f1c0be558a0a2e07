use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Message;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub document_context: bool,
    /// Title text while an inline rename is in progress.
    #[serde(skip)]
    pub title_edit: Option<String>,
}

impl ChatSession {
    pub fn is_editing(&self) -> bool {
        return self.title_edit.is_some();
    }
}

/// Sessions grouped by age for the history panel. Older sessions are left out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionBuckets<'a> {
    pub today: Vec<&'a ChatSession>,
    pub last_7_days: Vec<&'a ChatSession>,
    pub last_30_days: Vec<&'a ChatSession>,
}
