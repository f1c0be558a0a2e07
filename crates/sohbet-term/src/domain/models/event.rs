use super::ChatError;
use super::ChatReply;
use super::DocumentUpload;
use super::ModelName;

/// Identifies one outbound request so its completion can be matched back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(pub u64);

#[derive(Debug)]
pub enum Event {
    NewChat,
    SwitchSession(String),
    RenameSession { id: String, title: String },
    BeginRename(String),
    EditTitle { id: String, text: String },
    CommitRename(String),
    CancelRename(String),
    DeleteSession(String),
    DraftChanged(String),
    SearchDraftChanged(String),
    SetAgentMode(bool),
    SetDeepAnalysisMode(bool),
    SetSearchMode(bool),
    ToggleAgentMode,
    ToggleDeepAnalysisMode,
    ToggleSearchMode,
    SelectModel(ModelName),
    EditMessage(usize),
    Submit,
    Regenerate(usize),
    Upload(DocumentUpload),
    ChatCompleted {
        ticket: RequestTicket,
        result: Result<ChatReply, ChatError>,
    },
    RegenerateCompleted {
        ticket: RequestTicket,
        result: Result<ChatReply, ChatError>,
    },
    UploadCompleted {
        ticket: RequestTicket,
        result: Result<(), ChatError>,
    },
}
