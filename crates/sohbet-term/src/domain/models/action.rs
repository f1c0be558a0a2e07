use tokio_util::sync::CancellationToken;

use super::ChatRequest;
use super::DocumentUpload;
use super::RequestTicket;

/// Side effects requested by the state container.
#[derive(Debug, Clone)]
pub enum Action {
    SendChat {
        ticket: RequestTicket,
        request: ChatRequest,
        cancel: CancellationToken,
    },
    Regenerate {
        ticket: RequestTicket,
        request: ChatRequest,
    },
    UploadDocument {
        ticket: RequestTicket,
        document: DocumentUpload,
    },
}

impl Action {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            Action::SendChat { ticket, .. } => *ticket,
            Action::Regenerate { ticket, .. } => *ticket,
            Action::UploadDocument { ticket, .. } => *ticket,
        }
    }
}
