#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use tokio::fs;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use super::commands::help_text;
use super::commands::last_assistant_index;
use super::commands::Command;
use super::view::model_list;
use super::view::session_list;
use super::view::status_line;
use super::view::TranscriptView;
use crate::domain::models::Action;
use crate::domain::models::ChatBackendBox;
use crate::domain::models::DocumentUpload;
use crate::domain::models::Event;
use crate::domain::services::ActionsService;
use crate::domain::services::AppState;
use crate::domain::services::AppStateProps;

/// What a typed command turns into.
#[derive(Debug)]
pub enum Dispatch {
    Events(Vec<Event>),
    Print(String),
    Quit,
}

/// Maps a parsed command onto state events. Lookups that would be silently
/// ignored by the state container are reported here instead.
pub async fn dispatch(command: Command, app_state: &AppState) -> Dispatch {
    let known = |id: &str| app_state.sessions.get(id).is_some();

    match command {
        Command::Say(text) => {
            let draft = if app_state.is_search_mode() {
                Event::SearchDraftChanged(text)
            } else {
                Event::DraftChanged(text)
            };
            return Dispatch::Events(vec![draft, Event::Submit]);
        }
        Command::NewChat => return Dispatch::Events(vec![Event::NewChat]),
        Command::Sessions => return Dispatch::Print(session_list(app_state, &Local::now())),
        Command::Switch(id) if known(&id) => {
            return Dispatch::Events(vec![Event::SwitchSession(id)]);
        }
        Command::Rename { id, title } if known(&id) => {
            return Dispatch::Events(vec![
                Event::BeginRename(id.clone()),
                Event::EditTitle {
                    id: id.clone(),
                    text: title,
                },
                Event::CommitRename(id),
            ]);
        }
        Command::Delete(id) if known(&id) => {
            return Dispatch::Events(vec![Event::DeleteSession(id)]);
        }
        Command::Switch(id) | Command::Rename { id, .. } | Command::Delete(id) => {
            return Dispatch::Print(format!("Bilinmeyen sohbet: {id}"));
        }
        Command::ToggleAgent => return Dispatch::Events(vec![Event::ToggleAgentMode]),
        Command::ToggleDeepAnalysis => {
            return Dispatch::Events(vec![Event::ToggleDeepAnalysisMode]);
        }
        Command::ToggleSearch => return Dispatch::Events(vec![Event::ToggleSearchMode]),
        Command::Models => return Dispatch::Print(model_list(app_state.model)),
        Command::SelectModel(model) => return Dispatch::Events(vec![Event::SelectModel(model)]),
        Command::Upload(path) => {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();

            return match fs::read(&path).await {
                Ok(bytes) => Dispatch::Events(vec![Event::Upload(DocumentUpload {
                    file_name,
                    bytes,
                })]),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "document unreadable");
                    Dispatch::Print(format!("{}: {err}", path.display()))
                }
            };
        }
        Command::Regenerate(index) => {
            let index = index.or_else(|| last_assistant_index(app_state.sessions.transcript()));
            return match index {
                Some(index) => Dispatch::Events(vec![Event::Regenerate(index)]),
                None => Dispatch::Print("Yeniden oluşturulacak yanıt yok.".to_string()),
            };
        }
        Command::Edit(index) => return Dispatch::Events(vec![Event::EditMessage(index)]),
        Command::Help => return Dispatch::Print(help_text()),
        Command::Quit => return Dispatch::Quit,
        Command::Invalid(reason) => return Dispatch::Print(reason),
    }
}

pub async fn start_loop(
    backend: ChatBackendBox,
    props: AppStateProps,
    render_html: bool,
) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let worker = tokio::spawn(async move {
        return ActionsService::start(backend, event_tx, &mut action_rx).await;
    });

    let mut app_state = AppState::new(props);
    let mut view = TranscriptView::new(render_html);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "/help ile komutları görebilirsiniz.")?;
    writeln!(stdout, "{}", status_line(&app_state))?;

    loop {
        let events = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match Command::parse(&line) {
                    // An empty line sends whatever draft `/edit` left behind.
                    None if !app_state.active_draft().trim().is_empty() => vec![Event::Submit],
                    None => continue,
                    Some(command) => match dispatch(command, &app_state).await {
                        Dispatch::Events(events) => events,
                        Dispatch::Print(text) => {
                            writeln!(stdout, "{text}")?;
                            continue;
                        }
                        Dispatch::Quit => break,
                    },
                }
            }
            event = event_rx.recv() => match event {
                Some(event) => vec![event],
                None => break,
            },
        };

        for event in events {
            for action in app_state.handle(event) {
                action_tx.send(action)?;
            }
        }

        if let Some(out) = view.refresh(app_state.sessions.transcript()) {
            write!(stdout, "{out}")?;
        }
        if !app_state.active_draft().is_empty() {
            writeln!(stdout, "taslak: {}", app_state.active_draft())?;
        }
        writeln!(stdout, "{}", status_line(&app_state))?;
        stdout.flush()?;
    }

    app_state.cancel_in_flight();
    drop(action_tx);
    worker.await??;

    return Ok(());
}
