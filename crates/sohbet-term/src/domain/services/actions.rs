use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::models::Action;
use crate::domain::models::ChatBackend;
use crate::domain::models::ChatBackendBox;
use crate::domain::models::ChatError;
use crate::domain::models::Event;

/// Runs one action against the backend and turns its outcome into the
/// completion event the state container expects.
pub async fn execute(backend: &dyn ChatBackend, action: Action) -> Event {
    match action {
        Action::SendChat {
            ticket,
            request,
            cancel,
        } => {
            let result = backend
                .send_chat(request, &cancel)
                .await
                .map_err(ChatError::from);
            Event::ChatCompleted { ticket, result }
        }
        Action::Regenerate { ticket, request } => {
            let result = backend
                .send_chat(request, &CancellationToken::new())
                .await
                .map_err(ChatError::from);
            Event::RegenerateCompleted { ticket, result }
        }
        Action::UploadDocument { ticket, document } => {
            let result = backend
                .upload_document(document)
                .await
                .map_err(ChatError::from);
            Event::UploadCompleted { ticket, result }
        }
    }
}

pub struct ActionsService {}

impl ActionsService {
    /// Spawns a worker per action so requests never block the event loop.
    /// Returns once the action channel closes.
    pub async fn start(
        backend: ChatBackendBox,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend: Arc<dyn ChatBackend> = Arc::from(backend);

        while let Some(action) = rx.recv().await {
            let worker_backend = backend.clone();
            let worker_event_tx = event_tx.clone();
            tokio::spawn(async move {
                let event = execute(worker_backend.as_ref(), action).await;
                if worker_event_tx.send(event).is_err() {
                    tracing::debug!("event loop gone, completion dropped");
                }
            });
        }

        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        ChatReply, ChatRequest, ClientError, DocumentUpload, RequestTicket,
    };
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct MockBackend {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ChatBackend for MockBackend {
        async fn send_chat(
            &self,
            request: ChatRequest,
            cancel: &CancellationToken,
        ) -> Result<ChatReply, ClientError> {
            tokio::select! {
                _ = cancel.cancelled() => Err(ClientError::Cancelled),
                _ = self.release.notified() => Ok(ChatReply {
                    reply: format!("echo: {}", request.message),
                    ..Default::default()
                }),
            }
        }

        async fn upload_document(&self, document: DocumentUpload) -> Result<(), ClientError> {
            if document.bytes.is_empty() {
                return Err(ClientError::Status(400));
            }
            Ok(())
        }
    }

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            message: text.to_string(),
            use_context: false,
            use_deep_analysis: false,
            search_query: None,
            model: "m".to_string(),
        }
    }

    #[tokio::test]
    async fn test_execute_reports_cancellation() {
        let backend = MockBackend {
            release: Arc::new(Notify::new()),
        };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let event = execute(
            &backend,
            Action::SendChat {
                ticket: RequestTicket(1),
                request: request("hi"),
                cancel,
            },
        )
        .await;

        assert!(matches!(
            event,
            Event::ChatCompleted {
                ticket: RequestTicket(1),
                result: Err(ChatError::Cancelled)
            }
        ));
    }

    #[tokio::test]
    async fn test_execute_maps_upload_failures() {
        let backend = MockBackend {
            release: Arc::new(Notify::new()),
        };

        let event = execute(
            &backend,
            Action::UploadDocument {
                ticket: RequestTicket(3),
                document: DocumentUpload::default(),
            },
        )
        .await;

        assert!(matches!(
            event,
            Event::UploadCompleted {
                result: Err(ChatError::NetworkOrServerFailure(_)),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_start_reports_completions_as_events() {
        let release = Arc::new(Notify::new());
        let backend = MockBackend {
            release: release.clone(),
        };
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        tokio::spawn(async move {
            ActionsService::start(Box::new(backend), event_tx, &mut action_rx)
                .await
                .unwrap();
        });

        action_tx
            .send(Action::Regenerate {
                ticket: RequestTicket(2),
                request: request("again"),
            })
            .unwrap();
        release.notify_one();

        match event_rx.recv().await.unwrap() {
            Event::RegenerateCompleted { ticket, result } => {
                assert_eq!(ticket, RequestTicket(2));
                assert_eq!(result.unwrap().reply, "echo: again");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
