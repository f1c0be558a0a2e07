use std::io::Write;
use std::path::PathBuf;

use super::*;
use crate::domain::models::Message;
use crate::domain::models::ModelName;

fn state() -> AppState {
    return AppState::new(AppStateProps {
        model: ModelName::default(),
    });
}

fn events(dispatch: Dispatch) -> Vec<Event> {
    match dispatch {
        Dispatch::Events(events) => events,
        other => panic!("expected events, got {other:?}"),
    }
}

fn printed(dispatch: Dispatch) -> String {
    match dispatch {
        Dispatch::Print(text) => text,
        other => panic!("expected text, got {other:?}"),
    }
}

#[tokio::test]
async fn it_submits_plain_text_into_the_active_draft() {
    let mut app_state = state();
    let res = events(dispatch(Command::Say("Merhaba".to_string()), &app_state).await);
    assert!(matches!(&res[..], [Event::DraftChanged(text), Event::Submit] if text == "Merhaba"));

    app_state.handle(Event::SetSearchMode(true));
    let res = events(dispatch(Command::Say("rust".to_string()), &app_state).await);
    assert!(matches!(&res[..], [Event::SearchDraftChanged(text), Event::Submit] if text == "rust"));
}

#[tokio::test]
async fn it_renames_through_the_inline_editor() {
    let mut app_state = state();
    let id = app_state
        .sessions
        .create_session(vec![], "eski", false)
        .id
        .clone();

    let res = events(
        dispatch(
            Command::Rename {
                id: id.clone(),
                title: "yeni".to_string(),
            },
            &app_state,
        )
        .await,
    );
    for event in res {
        app_state.handle(event);
    }

    let session = app_state.sessions.get(&id).unwrap();
    assert_eq!(session.title, "yeni");
    assert!(!session.is_editing());
}

#[tokio::test]
async fn it_reports_unknown_sessions() {
    let app_state = state();
    assert_eq!(
        printed(dispatch(Command::Switch("42".to_string()), &app_state).await),
        "Bilinmeyen sohbet: 42"
    );
    assert_eq!(
        printed(dispatch(Command::Delete("42".to_string()), &app_state).await),
        "Bilinmeyen sohbet: 42"
    );
}

#[tokio::test]
async fn it_regenerates_the_newest_reply_by_default() {
    let mut app_state = state();
    assert_eq!(
        printed(dispatch(Command::Regenerate(None), &app_state).await),
        "Yeniden oluşturulacak yanıt yok."
    );

    app_state.sessions.create_session(
        vec![
            Message::user("a"),
            Message::assistant("b", false),
            Message::user("c"),
            Message::assistant("d", false),
        ],
        "a...",
        false,
    );
    let res = events(dispatch(Command::Regenerate(None), &app_state).await);
    assert!(matches!(&res[..], [Event::Regenerate(3)]));
}

#[tokio::test]
async fn it_reads_documents_for_upload() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notlar.txt");
    let mut file = std::fs::File::create(&path)?;
    file.write_all("içerik".as_bytes())?;

    let res = events(dispatch(Command::Upload(path), &state()).await);
    match &res[..] {
        [Event::Upload(document)] => {
            assert_eq!(document.file_name, "notlar.txt");
            assert_eq!(document.bytes, "içerik".as_bytes());
        }
        other => panic!("unexpected events {other:?}"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_reports_unreadable_documents() {
    let text = printed(
        dispatch(
            Command::Upload(PathBuf::from("/nonexistent/rapor.pdf")),
            &state(),
        )
        .await,
    );
    assert!(text.starts_with("/nonexistent/rapor.pdf: "));
}

#[tokio::test]
async fn it_quits() {
    assert!(matches!(
        dispatch(Command::Quit, &state()).await,
        Dispatch::Quit
    ));
}
