use chrono::FixedOffset;
use chrono::TimeZone;

use super::*;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    return Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();
}

#[test]
fn it_creates_sessions_most_recent_first_and_activates_them() {
    let mut sessions = Sessions::new();
    sessions.create_session_at(vec![Message::user("a")], "first", false, at(2024, 5, 1, 9, 0));
    let second_id = sessions
        .create_session_at(vec![Message::user("b")], "second", true, at(2024, 5, 1, 10, 0))
        .id
        .clone();

    assert_eq!(sessions.list().len(), 2);
    assert_eq!(sessions.list()[0].title, "second");
    assert_eq!(sessions.active_id(), Some(second_id.as_str()));
    assert_eq!(sessions.transcript(), &[Message::user("b")]);
    assert!(sessions.active().unwrap().document_context);
}

#[test]
fn it_generates_unique_ids_within_the_same_millisecond() {
    let mut sessions = Sessions::new();
    let now = at(2024, 5, 1, 9, 0);
    let first = sessions.create_session_at(vec![], "a", false, now).id.clone();
    let second = sessions.create_session_at(vec![], "b", false, now).id.clone();

    assert_eq!(first, now.timestamp_millis().to_string());
    assert_ne!(first, second);
}

#[test]
fn it_switches_and_ignores_unknown_ids() {
    let mut sessions = Sessions::new();
    let first = sessions
        .create_session_at(vec![Message::user("a")], "first", false, at(2024, 5, 1, 9, 0))
        .id
        .clone();
    sessions.create_session_at(vec![Message::user("b")], "second", false, at(2024, 5, 1, 10, 0));

    sessions.switch_active(&first);
    assert_eq!(sessions.active_id(), Some(first.as_str()));
    assert_eq!(sessions.transcript(), &[Message::user("a")]);

    sessions.switch_active("missing");
    assert_eq!(sessions.active_id(), Some(first.as_str()));
    assert_eq!(sessions.transcript(), &[Message::user("a")]);
}

#[test]
fn it_keeps_transcript_and_active_session_in_sync_on_append() {
    let mut sessions = Sessions::new();
    sessions.create_session_at(vec![Message::user("a")], "t", false, at(2024, 5, 1, 9, 0));
    sessions
        .append_to_active(Message::assistant("b", false))
        .unwrap();

    assert_eq!(sessions.transcript().len(), 2);
    assert_eq!(sessions.active().unwrap().messages, sessions.transcript());
}

#[test]
fn it_refuses_append_to_active_without_a_session() {
    let mut sessions = Sessions::new();
    let res = sessions.append_to_active(Message::user("a"));
    assert_eq!(res, Err(ChatError::NoActiveSession));
    assert_eq!(ChatError::NoActiveSession.to_string(), "no session is active");
    assert!(sessions.transcript().is_empty());

    sessions.append(Message::user("a"));
    assert_eq!(sessions.transcript(), &[Message::user("a")]);
}

#[test]
fn it_renames_through_the_inline_editor() {
    let mut sessions = Sessions::new();
    let id = sessions
        .create_session_at(vec![], "old", false, at(2024, 5, 1, 9, 0))
        .id
        .clone();

    sessions.begin_rename(&id);
    assert_eq!(sessions.get(&id).unwrap().title_edit.as_deref(), Some("old"));
    sessions.edit_title(&id, "new");
    assert_eq!(sessions.get(&id).unwrap().title, "old");
    sessions.commit_rename(&id);

    let session = sessions.get(&id).unwrap();
    assert_eq!(session.title, "new");
    assert!(!session.is_editing());

    sessions.begin_rename(&id);
    sessions.edit_title(&id, "discarded");
    sessions.cancel_rename(&id);
    assert_eq!(sessions.get(&id).unwrap().title, "new");

    sessions.rename_session(&id, "direct");
    sessions.rename_session("missing", "ignored");
    assert_eq!(sessions.get(&id).unwrap().title, "direct");
}

#[test]
fn it_clears_the_transcript_when_deleting_the_active_session() {
    let mut sessions = Sessions::new();
    let first = sessions
        .create_session_at(vec![Message::user("a")], "first", false, at(2024, 5, 1, 9, 0))
        .id
        .clone();
    let second = sessions
        .create_session_at(vec![Message::user("b")], "second", false, at(2024, 5, 1, 10, 0))
        .id
        .clone();

    sessions.delete_session(&first);
    assert_eq!(sessions.active_id(), Some(second.as_str()));
    assert_eq!(sessions.transcript().len(), 1);

    sessions.delete_session(&second);
    assert_eq!(sessions.active_id(), None);
    assert!(sessions.transcript().is_empty());
    assert!(sessions.list().is_empty());

    sessions.delete_session("missing");
}

#[test]
fn it_never_unsets_document_context() {
    let mut sessions = Sessions::new();
    let id = sessions
        .create_session_at(vec![], "doc", false, at(2024, 5, 1, 9, 0))
        .id
        .clone();
    sessions.mark_document_context(&id).unwrap();
    sessions.replace_transcript(vec![Message::user("x")]);

    assert!(sessions.get(&id).unwrap().document_context);
    assert!(sessions.mark_document_context("missing").is_err());
}

#[test]
fn it_categorizes_by_calendar_day() {
    let tz = FixedOffset::east_opt(3 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 5, 20, 15, 30, 0).unwrap();
    let start_of_today = tz.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
    let just_before_today = tz.with_ymd_and_hms(2024, 5, 19, 23, 59, 0).unwrap();
    let seven_days_ago = tz.with_ymd_and_hms(2024, 5, 13, 8, 0, 0).unwrap();
    let eight_days_ago = tz.with_ymd_and_hms(2024, 5, 12, 8, 0, 0).unwrap();
    let thirty_days_ago = tz.with_ymd_and_hms(2024, 4, 20, 8, 0, 0).unwrap();
    let older = tz.with_ymd_and_hms(2024, 4, 19, 23, 0, 0).unwrap();

    let mut sessions = Sessions::new();
    for (title, created) in [
        ("older", older),
        ("thirty", thirty_days_ago),
        ("eight", eight_days_ago),
        ("seven", seven_days_ago),
        ("yesterday", just_before_today),
        ("today", start_of_today),
    ] {
        sessions.create_session_at(vec![], title, false, created.with_timezone(&Utc));
    }

    let buckets = sessions.categorize(&now);
    let titles = |list: &Vec<&ChatSession>| {
        list.iter().map(|s| s.title.clone()).collect::<Vec<_>>()
    };

    assert_eq!(titles(&buckets.today), vec!["today"]);
    assert_eq!(titles(&buckets.last_7_days), vec!["yesterday", "seven"]);
    assert_eq!(titles(&buckets.last_30_days), vec!["eight", "thirty"]);

    let bucketed = buckets.today.len() + buckets.last_7_days.len() + buckets.last_30_days.len();
    assert_eq!(bucketed, sessions.list().len() - 1);
}

#[test]
fn it_uses_the_time_zone_of_now_for_day_boundaries() {
    // 22:30 UTC on the 19th is already the 20th at UTC+3.
    let created = Utc.with_ymd_and_hms(2024, 5, 19, 22, 30, 0).unwrap();
    let mut sessions = Sessions::new();
    sessions.create_session_at(vec![], "late", false, created);

    let tz = FixedOffset::east_opt(3 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();
    assert_eq!(sessions.categorize(&now).today.len(), 1);

    let now_utc = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();
    let buckets = sessions.categorize(&now_utc);
    assert!(buckets.today.is_empty());
    assert_eq!(buckets.last_7_days.len(), 1);
}

#[test]
fn it_stores_sessions_without_activating_them() {
    let mut sessions = Sessions::new();
    let active = sessions
        .create_session(vec![Message::user("a")], "a...", false)
        .id
        .clone();

    let stored = sessions
        .store_session(vec![Message::user("x")], "x...", false)
        .id
        .clone();

    assert_eq!(sessions.active_id(), Some(active.as_str()));
    assert_eq!(sessions.transcript(), &[Message::user("a")]);
    assert_eq!(sessions.list()[0].id, stored);
    assert_eq!(sessions.get(&stored).unwrap().messages, vec![Message::user("x")]);
}
