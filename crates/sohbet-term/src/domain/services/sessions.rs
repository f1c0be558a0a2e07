use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;

use crate::domain::models::ChatError;
use crate::domain::models::ChatSession;
use crate::domain::models::Message;
use crate::domain::models::SessionBuckets;

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

/// In-memory session store. Owns every session, the active id and the live
/// transcript shown for the active session.
#[derive(Debug, Default, Clone)]
pub struct Sessions {
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    transcript: Vec<Message>,
    last_id_millis: i64,
}

impl Sessions {
    pub fn new() -> Sessions {
        return Sessions::default();
    }

    /// Most recent first.
    pub fn list(&self) -> &[ChatSession] {
        return &self.sessions;
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        return self.sessions.iter().find(|session| session.id == id);
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut ChatSession, ChatError> {
        return self
            .sessions
            .iter_mut()
            .find(|session| session.id == id)
            .ok_or_else(|| ChatError::UnknownSession(id.to_string()));
    }

    pub fn active_id(&self) -> Option<&str> {
        return self.active_id.as_deref();
    }

    pub fn active(&self) -> Option<&ChatSession> {
        let id = self.active_id.as_deref()?;
        return self.get(id);
    }

    pub fn transcript(&self) -> &[Message] {
        return &self.transcript;
    }

    pub fn create_session(
        &mut self,
        seed: Vec<Message>,
        title: &str,
        document_context: bool,
    ) -> &ChatSession {
        return self.create_session_at(seed, title, document_context, Utc::now());
    }

    /// Allocates a session, prepends it and makes it active. The live
    /// transcript becomes the seed.
    pub fn create_session_at(
        &mut self,
        seed: Vec<Message>,
        title: &str,
        document_context: bool,
        now: DateTime<Utc>,
    ) -> &ChatSession {
        self.store_session_at(seed.clone(), title, document_context, now);
        self.active_id = Some(self.sessions[0].id.clone());
        self.transcript = seed;

        return &self.sessions[0];
    }

    /// Allocates and prepends a session without touching the active one.
    pub fn store_session(
        &mut self,
        seed: Vec<Message>,
        title: &str,
        document_context: bool,
    ) -> &ChatSession {
        return self.store_session_at(seed, title, document_context, Utc::now());
    }

    pub fn store_session_at(
        &mut self,
        seed: Vec<Message>,
        title: &str,
        document_context: bool,
        now: DateTime<Utc>,
    ) -> &ChatSession {
        let session = ChatSession {
            id: self.next_id(now),
            title: title.to_string(),
            messages: seed,
            created_at: now,
            document_context,
            title_edit: None,
        };

        tracing::debug!(id = %session.id, title = %session.title, "session created");
        self.sessions.insert(0, session);

        return &self.sessions[0];
    }

    // Ids come from the creation time in milliseconds, bumped past the last
    // issued id when two sessions land on the same millisecond.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        if millis <= self.last_id_millis {
            millis = self.last_id_millis + 1;
        }
        self.last_id_millis = millis;

        return millis.to_string();
    }

    pub fn switch_active(&mut self, id: &str) {
        let Some(messages) = self.get(id).map(|session| session.messages.clone()) else {
            tracing::debug!(id, "switch to unknown session ignored");
            return;
        };

        self.transcript = messages;
        self.active_id = Some(id.to_string());
    }

    /// Drops the active selection and empties the live transcript.
    pub fn clear_active(&mut self) {
        self.active_id = None;
        self.transcript = vec![];
    }

    pub fn append_to_active(&mut self, message: Message) -> Result<(), ChatError> {
        let id = self
            .active_id
            .clone()
            .ok_or(ChatError::NoActiveSession)?;

        let session = self.find_mut(&id)?;
        session.messages.push(message.clone());
        self.transcript.push(message);

        return Ok(());
    }

    /// Appends to the live transcript and, when a session is active, to its
    /// stored messages as well.
    pub fn append(&mut self, message: Message) {
        if self.active_id.is_some() {
            if self.append_to_active(message.clone()).is_ok() {
                return;
            }
        }

        self.transcript.push(message);
    }

    /// Replaces the live transcript and writes it through to the active session.
    pub fn replace_transcript(&mut self, messages: Vec<Message>) {
        if let Some(id) = self.active_id.clone() {
            if let Ok(session) = self.find_mut(&id) {
                session.messages = messages.clone();
            }
        }

        self.transcript = messages;
    }

    pub fn append_to_session(&mut self, id: &str, message: Message) -> Result<(), ChatError> {
        if self.active_id.as_deref() == Some(id) {
            return self.append_to_active(message);
        }

        self.find_mut(id)?.messages.push(message);
        return Ok(());
    }

    /// Flags a session as backed by an indexed document. The flag is sticky.
    pub fn mark_document_context(&mut self, id: &str) -> Result<(), ChatError> {
        self.find_mut(id)?.document_context = true;
        return Ok(());
    }

    pub fn rename_session(&mut self, id: &str, title: &str) {
        match self.find_mut(id) {
            Ok(session) => {
                session.title = title.to_string();
                session.title_edit = None;
            }
            Err(err) => tracing::debug!(error = %err, "rename ignored"),
        }
    }

    pub fn begin_rename(&mut self, id: &str) {
        if let Ok(session) = self.find_mut(id) {
            session.title_edit = Some(session.title.clone());
        }
    }

    pub fn edit_title(&mut self, id: &str, text: &str) {
        if let Ok(session) = self.find_mut(id) {
            if session.title_edit.is_some() {
                session.title_edit = Some(text.to_string());
            }
        }
    }

    pub fn commit_rename(&mut self, id: &str) {
        if let Ok(session) = self.find_mut(id) {
            if let Some(title) = session.title_edit.take() {
                session.title = title;
            }
        }
    }

    pub fn cancel_rename(&mut self, id: &str) {
        if let Ok(session) = self.find_mut(id) {
            session.title_edit = None;
        }
    }

    pub fn delete_session(&mut self, id: &str) {
        let before = self.sessions.len();
        self.sessions.retain(|session| session.id != id);
        if self.sessions.len() == before {
            tracing::debug!(id, "delete of unknown session ignored");
            return;
        }

        if self.active_id.as_deref() == Some(id) {
            self.clear_active();
        }
    }

    /// Groups sessions by the calendar day of their creation, evaluated in
    /// the time zone of `now`.
    pub fn categorize<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> SessionBuckets<'_> {
        let tz = now.timezone();
        let today = now.date_naive();
        let seven_days_ago = today - Duration::days(7);
        let thirty_days_ago = today - Duration::days(30);

        let mut buckets = SessionBuckets::default();
        for session in &self.sessions {
            let day = session.created_at.with_timezone(&tz).date_naive();
            if day == today {
                buckets.today.push(session);
            } else if day < today && day >= seven_days_ago {
                buckets.last_7_days.push(session);
            } else if day < seven_days_ago && day >= thirty_days_ago {
                buckets.last_30_days.push(session);
            }
        }

        return buckets;
    }
}
