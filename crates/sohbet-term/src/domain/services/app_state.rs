use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use super::Sessions;
use crate::domain::models::Action;
use crate::domain::models::ChatError;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::DocumentUpload;
use crate::domain::models::Event;
use crate::domain::models::InputMode;
use crate::domain::models::Message;
use crate::domain::models::ModelName;
use crate::domain::models::RequestTicket;
use crate::domain::models::Role;
use crate::domain::models::SubmissionOutcome;
use crate::domain::models::SubmissionPhase;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

const TITLE_CHARS: usize = 30;

pub struct AppStateProps {
    pub model: ModelName,
}

struct PendingSubmission {
    ticket: RequestTicket,
    cancel: CancellationToken,
    origin: Option<String>,
    text: String,
    model: ModelName,
    /// Transcript right after the user message went out, kept only when no
    /// session was active. Seeds the session created on success.
    seed: Vec<Message>,
}

struct PendingRegeneration {
    origin: Option<String>,
}

struct PendingUpload {
    origin: Option<String>,
    file_name: String,
}

/// Page-level controller. Every user interaction and every backend completion
/// arrives as an [`Event`]; side effects leave as [`Action`]s.
pub struct AppState {
    pub sessions: Sessions,
    pub draft: String,
    pub search_draft: String,
    pub model: ModelName,
    mode: InputMode,
    pending: Option<PendingSubmission>,
    regenerations: HashMap<RequestTicket, PendingRegeneration>,
    uploads: HashMap<RequestTicket, PendingUpload>,
    last_ticket: u64,
    last_outcome: Option<SubmissionOutcome>,
}

impl AppState {
    pub fn new(props: AppStateProps) -> AppState {
        return AppState {
            sessions: Sessions::new(),
            draft: String::new(),
            search_draft: String::new(),
            model: props.model,
            mode: InputMode::default(),
            pending: None,
            regenerations: HashMap::new(),
            uploads: HashMap::new(),
            last_ticket: 0,
            last_outcome: None,
        };
    }

    pub fn handle(&mut self, event: Event) -> Vec<Action> {
        let action = match event {
            Event::NewChat => {
                self.new_chat();
                None
            }
            Event::SwitchSession(id) => {
                self.sessions.switch_active(&id);
                None
            }
            Event::RenameSession { id, title } => {
                self.sessions.rename_session(&id, &title);
                None
            }
            Event::BeginRename(id) => {
                self.sessions.begin_rename(&id);
                None
            }
            Event::EditTitle { id, text } => {
                self.sessions.edit_title(&id, &text);
                None
            }
            Event::CommitRename(id) => {
                self.sessions.commit_rename(&id);
                None
            }
            Event::CancelRename(id) => {
                self.sessions.cancel_rename(&id);
                None
            }
            Event::DeleteSession(id) => {
                self.sessions.delete_session(&id);
                None
            }
            Event::DraftChanged(text) => {
                self.draft = text;
                None
            }
            Event::SearchDraftChanged(text) => {
                self.search_draft = text;
                None
            }
            Event::SetAgentMode(on) => {
                self.set_agent_mode(on);
                None
            }
            Event::SetDeepAnalysisMode(on) => {
                self.set_deep_analysis_mode(on);
                None
            }
            Event::SetSearchMode(on) => {
                self.set_search_mode(on);
                None
            }
            Event::ToggleAgentMode => {
                self.set_agent_mode(!self.is_agent_mode());
                None
            }
            Event::ToggleDeepAnalysisMode => {
                self.set_deep_analysis_mode(!self.is_deep_analysis_mode());
                None
            }
            Event::ToggleSearchMode => {
                self.set_search_mode(!self.is_search_mode());
                None
            }
            Event::SelectModel(model) => {
                self.model = model;
                None
            }
            Event::EditMessage(index) => {
                self.edit_message(index);
                None
            }
            Event::Submit => self.submit(),
            Event::Regenerate(index) => self.regenerate(index),
            Event::Upload(document) => Some(self.upload_document(document)),
            Event::ChatCompleted { ticket, result } => {
                self.handle_chat_completed(ticket, result);
                None
            }
            Event::RegenerateCompleted { ticket, result } => {
                self.handle_regenerate_completed(ticket, result);
                None
            }
            Event::UploadCompleted { ticket, result } => {
                self.handle_upload_completed(ticket, result);
                None
            }
        };

        return action.into_iter().collect();
    }

    pub fn mode(&self) -> InputMode {
        return self.mode;
    }

    pub fn is_agent_mode(&self) -> bool {
        return self.mode == InputMode::Agent;
    }

    pub fn is_deep_analysis_mode(&self) -> bool {
        return self.mode == InputMode::DeepAnalysis;
    }

    pub fn is_search_mode(&self) -> bool {
        return self.mode == InputMode::Search;
    }

    pub fn is_loading(&self) -> bool {
        return self.pending.is_some() || !self.regenerations.is_empty();
    }

    pub fn is_uploading(&self) -> bool {
        return !self.uploads.is_empty();
    }

    pub fn phase(&self) -> SubmissionPhase {
        if self.pending.is_some() {
            return SubmissionPhase::Sending;
        }

        if self.active_draft().trim().is_empty() {
            return SubmissionPhase::Idle;
        }

        return SubmissionPhase::Composing;
    }

    pub fn last_outcome(&self) -> Option<SubmissionOutcome> {
        return self.last_outcome;
    }

    /// Draft belonging to the input affordance currently shown.
    pub fn active_draft(&self) -> &str {
        if self.is_search_mode() {
            return &self.search_draft;
        }

        return &self.draft;
    }

    fn enter_mode(&mut self, mode: InputMode) {
        if self.mode == mode {
            return;
        }

        if self.is_search_mode() && !self.search_draft.is_empty() {
            self.draft = self.search_draft.clone();
        }

        if mode == InputMode::Search && !self.draft.is_empty() {
            self.search_draft = self.draft.clone();
        }

        tracing::debug!(from = %self.mode, to = %mode, "input mode changed");
        self.mode = mode;
    }

    fn leave_mode(&mut self, mode: InputMode) {
        if self.mode == mode {
            self.enter_mode(InputMode::Chat);
        }
    }

    pub fn set_agent_mode(&mut self, on: bool) {
        if on {
            self.enter_mode(InputMode::Agent);
        } else {
            self.leave_mode(InputMode::Agent);
        }
    }

    pub fn set_deep_analysis_mode(&mut self, on: bool) {
        if on {
            self.enter_mode(InputMode::DeepAnalysis);
        } else {
            self.leave_mode(InputMode::DeepAnalysis);
        }
    }

    pub fn set_search_mode(&mut self, on: bool) {
        if on {
            self.enter_mode(InputMode::Search);
        } else {
            self.leave_mode(InputMode::Search);
        }
    }

    /// Puts an earlier user message back into the general draft.
    pub fn edit_message(&mut self, index: usize) {
        if let Some(message) = self.sessions.transcript().get(index) {
            if message.role == Role::User {
                self.draft = message.content.clone();
            }
        }
    }

    /// Starts a blank conversation, abandoning any outstanding submission.
    pub fn new_chat(&mut self) {
        self.cancel_in_flight();
        // Regenerations of an unsaved transcript have nowhere to land anymore.
        self.regenerations.retain(|_, regen| regen.origin.is_some());
        self.sessions.clear_active();
    }

    pub fn cancel_in_flight(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
            self.last_outcome = Some(SubmissionOutcome::Cancelled);
            tracing::info!(ticket = pending.ticket.0, "in-flight submission cancelled");
        }
    }

    fn next_ticket(&mut self) -> RequestTicket {
        self.last_ticket += 1;
        return RequestTicket(self.last_ticket);
    }

    pub fn submit(&mut self) -> Option<Action> {
        match self.prepare_submission() {
            Ok(action) => Some(action),
            Err(err) => {
                tracing::debug!(error = %err, "submission ignored");
                None
            }
        }
    }

    fn prepare_submission(&mut self) -> Result<Action, ChatError> {
        let text = self.active_draft().to_string();
        if text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        self.cancel_in_flight();

        let origin = self.sessions.active_id().map(str::to_string);
        let use_context = self
            .sessions
            .active()
            .map(|session| session.document_context)
            .unwrap_or(false);

        self.sessions.append(Message::user(&text));
        self.draft.clear();
        self.search_draft.clear();

        let request = ChatRequest {
            message: text.clone(),
            use_context,
            use_deep_analysis: self.is_deep_analysis_mode(),
            search_query: self.is_search_mode().then(|| text.clone()),
            model: self.model.backend_id().to_string(),
        };

        let seed = match origin {
            Some(_) => vec![],
            None => self.sessions.transcript().to_vec(),
        };
        let ticket = self.next_ticket();
        let cancel = CancellationToken::new();
        self.pending = Some(PendingSubmission {
            ticket,
            cancel: cancel.clone(),
            origin,
            text,
            model: self.model,
            seed,
        });

        tracing::debug!(ticket = ticket.0, model = %self.model, "submission issued");
        return Ok(Action::SendChat {
            ticket,
            request,
            cancel,
        });
    }

    fn handle_chat_completed(&mut self, ticket: RequestTicket, result: Result<ChatReply, ChatError>) {
        let is_current = self
            .pending
            .as_ref()
            .map(|pending| pending.ticket == ticket && !pending.cancel.is_cancelled())
            .unwrap_or(false);
        if !is_current {
            tracing::debug!(ticket = ticket.0, "stale chat completion dropped");
            return;
        }

        let Some(pending) = self.pending.take() else {
            return;
        };

        let message = match result {
            Ok(reply) => {
                self.last_outcome = Some(SubmissionOutcome::Received);
                Message {
                    role: Role::Assistant,
                    content: reply.reply,
                    has_context: Some(reply.has_context),
                    thoughts: reply.thoughts,
                    search_results: reply.search_results,
                    model: Some(pending.model),
                }
            }
            Err(ChatError::Cancelled) => {
                self.last_outcome = Some(SubmissionOutcome::Cancelled);
                return;
            }
            Err(err) => {
                tracing::error!(error = %err, ticket = ticket.0, "chat request failed");
                self.last_outcome = Some(SubmissionOutcome::Failed);
                Message::fallback()
            }
        };

        let succeeded = self.last_outcome == Some(SubmissionOutcome::Received);
        let unsaved = self.sessions.active_id().is_none();
        match pending.origin {
            Some(id) => {
                if let Err(err) = self.sessions.append_to_session(&id, message) {
                    tracing::debug!(error = %err, "chat completion dropped");
                }
            }
            None if !succeeded && unsaved => self.sessions.append(message),
            None if !succeeded => {
                tracing::debug!(ticket = ticket.0, "fallback for an unsaved chat dropped");
            }
            None => {
                let title = format!(
                    "{}...",
                    pending.text.chars().take(TITLE_CHARS).collect::<String>()
                );
                // The user may have opened another session meanwhile. The
                // conversation is still saved, just not brought to the front.
                if unsaved && self.sessions.transcript().starts_with(&pending.seed) {
                    let mut seed = self.sessions.transcript().to_vec();
                    seed.push(message);
                    self.sessions.create_session(seed, &title, false);
                } else {
                    let mut seed = pending.seed;
                    seed.push(message);
                    self.sessions.store_session(seed, &title, false);
                }
            }
        }
    }

    /// Re-asks the backend for the assistant message at `index`, dropping it
    /// and everything after it.
    pub fn regenerate(&mut self, index: usize) -> Option<Action> {
        let transcript = self.sessions.transcript();
        let target = transcript.get(index)?;
        if !target.is_assistant() {
            return None;
        }

        let prompt = transcript[..index].iter().rev().find(|m| m.is_user())?;
        let request = ChatRequest {
            message: prompt.content.clone(),
            use_context: target.used_context(),
            use_deep_analysis: false,
            search_query: None,
            model: self.model.backend_id().to_string(),
        };

        let truncated = transcript[..index].to_vec();
        self.sessions.replace_transcript(truncated);

        let ticket = self.next_ticket();
        self.regenerations.insert(
            ticket,
            PendingRegeneration {
                origin: self.sessions.active_id().map(str::to_string),
            },
        );

        tracing::debug!(ticket = ticket.0, index, "regeneration issued");
        return Some(Action::Regenerate { ticket, request });
    }

    fn handle_regenerate_completed(
        &mut self,
        ticket: RequestTicket,
        result: Result<ChatReply, ChatError>,
    ) {
        let Some(regen) = self.regenerations.remove(&ticket) else {
            tracing::debug!(ticket = ticket.0, "stale regeneration dropped");
            return;
        };

        let message = match result {
            Ok(reply) => Message::assistant(&reply.reply, reply.has_context),
            Err(ChatError::Cancelled) => return,
            Err(err) => {
                tracing::error!(error = %err, ticket = ticket.0, "regeneration failed");
                Message::fallback()
            }
        };

        match regen.origin {
            Some(id) => {
                if let Err(err) = self.sessions.append_to_session(&id, message) {
                    tracing::debug!(error = %err, "regeneration dropped");
                }
            }
            None if self.sessions.active_id().is_none() => self.sessions.append(message),
            None => tracing::debug!(ticket = ticket.0, "regeneration target gone"),
        }
    }

    pub fn upload_document(&mut self, document: DocumentUpload) -> Action {
        let ticket = self.next_ticket();
        self.uploads.insert(
            ticket,
            PendingUpload {
                origin: self.sessions.active_id().map(str::to_string),
                file_name: document.file_name.clone(),
            },
        );

        tracing::debug!(ticket = ticket.0, file = %document.file_name, "upload issued");
        return Action::UploadDocument { ticket, document };
    }

    fn handle_upload_completed(&mut self, ticket: RequestTicket, result: Result<(), ChatError>) {
        let Some(upload) = self.uploads.remove(&ticket) else {
            return;
        };

        if let Err(err) = &result {
            tracing::error!(error = %err, file = %upload.file_name, "upload failed");
        }

        match (upload.origin, result) {
            (None, Ok(())) => {
                self.sessions
                    .create_session(vec![Message::upload_succeeded()], &upload.file_name, true);
            }
            (None, Err(_)) if self.sessions.active_id().is_none() => {
                self.sessions.append(Message::upload_failed());
            }
            (None, Err(_)) => tracing::debug!(ticket = ticket.0, "upload failure notice dropped"),
            (Some(id), Ok(())) => {
                let res = self
                    .sessions
                    .mark_document_context(&id)
                    .and_then(|_| self.sessions.append_to_session(&id, Message::upload_succeeded()));
                if let Err(err) = res {
                    tracing::debug!(error = %err, "upload confirmation dropped");
                }
            }
            (Some(id), Err(_)) => {
                if let Err(err) = self.sessions.append_to_session(&id, Message::upload_failed()) {
                    tracing::debug!(error = %err, "upload failure notice dropped");
                }
            }
        }
    }
}
