#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::TimeZone;
use strum::IntoEnumIterator;

use crate::domain::models::ChatSession;
use crate::domain::models::Message;
use crate::domain::models::ModelName;
use crate::domain::services::markup;
use crate::domain::services::AppState;

/// Keeps track of what has been written to the terminal so only new messages
/// are printed, unless the transcript was replaced underneath.
#[derive(Default)]
pub struct TranscriptView {
    shown: Vec<Message>,
    render_html: bool,
}

impl TranscriptView {
    pub fn new(render_html: bool) -> TranscriptView {
        return TranscriptView {
            shown: vec![],
            render_html,
        };
    }

    /// Text to print so the terminal matches `transcript`, if anything changed.
    pub fn refresh(&mut self, transcript: &[Message]) -> Option<String> {
        if transcript == self.shown.as_slice() {
            return None;
        }

        let appended = transcript.len() > self.shown.len()
            && transcript[..self.shown.len()] == self.shown[..];

        let (start, mut out) = if appended {
            (self.shown.len(), String::new())
        } else {
            (0, "──────── sohbet ────────\n".to_string())
        };

        for (index, message) in transcript.iter().enumerate().skip(start) {
            out.push_str(&self.message(index, message));
        }

        self.shown = transcript.to_vec();
        return Some(out);
    }

    fn message(&self, index: usize, message: &Message) -> String {
        let body = if self.render_html && message.is_assistant() {
            markup::render(&message.content)
        } else {
            message.content.clone()
        };

        let mut label = message.role.to_string();
        if let Some(model) = message.model {
            label = format!("{label} · {}", model.display_name());
        }
        if message.used_context() {
            label = format!("{label} · doküman");
        }

        let mut out = format!("[{index}] {label}\n{body}\n");

        if let Some(thoughts) = &message.thoughts {
            for thought in thoughts {
                out.push_str(&format!("  ({}) {}\n", thought.step, thought.thought));
            }
        }
        if let Some(results) = &message.search_results {
            out.push_str(&format!("  arama: {results}\n"));
        }

        out.push('\n');
        return out;
    }
}

/// One-line status shown before each prompt.
pub fn status_line(state: &AppState) -> String {
    let mut parts = vec![
        format!("mode: {}", state.mode()),
        format!("model: {}", state.model.display_name()),
    ];

    if let Some(session) = state.sessions.active() {
        parts.push(format!("chat: {}", session.title));
    }
    if state.is_loading() {
        parts.push("yanıt bekleniyor".to_string());
    }
    if state.is_uploading() {
        parts.push("yükleniyor".to_string());
    }

    return format!("{} | {}", parts.join(" | "), state.mode().placeholder());
}

pub fn session_list<Tz: TimeZone>(state: &AppState, now: &DateTime<Tz>) -> String {
    let buckets = state.sessions.categorize(now);
    let active_id = state.sessions.active_id();

    let groups: [(&str, &Vec<&ChatSession>); 3] = [
        ("Bugün", &buckets.today),
        ("Son 7 Gün", &buckets.last_7_days),
        ("Son 30 Gün", &buckets.last_30_days),
    ];

    let mut out = String::new();
    for (heading, sessions) in groups {
        if sessions.is_empty() {
            continue;
        }

        out.push_str(&format!("{heading}\n"));
        for session in sessions {
            let marker = if Some(session.id.as_str()) == active_id {
                "*"
            } else {
                " "
            };
            out.push_str(&format!("{marker} {}  {}\n", session.id, session.title));
        }
    }

    if out.is_empty() {
        return "Henüz sohbet yok.".to_string();
    }

    return out.trim_end().to_string();
}

pub fn model_list(selected: ModelName) -> String {
    return ModelName::iter()
        .map(|model| {
            let marker = if model == selected { "*" } else { " " };
            format!("{marker} {:<12} {}", model.to_string(), model.display_name())
        })
        .collect::<Vec<String>>()
        .join("\n");
}
