#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;

use std::path::PathBuf;

use crate::domain::models::Message;
use crate::domain::models::ModelName;

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    NewChat,
    Sessions,
    Switch(String),
    Rename { id: String, title: String },
    Delete(String),
    ToggleAgent,
    ToggleDeepAnalysis,
    ToggleSearch,
    Models,
    SelectModel(ModelName),
    Upload(PathBuf),
    Regenerate(Option<usize>),
    Edit(usize),
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(input: &str) -> Option<Command> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if !trimmed.starts_with('/') {
            return Some(Command::Say(input.to_string()));
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        let command = match name {
            "/new" | "/n" => Command::NewChat,
            "/sessions" | "/s" => Command::Sessions,
            "/switch" => with_arg(rest, "/switch <id>", |id| Command::Switch(id.to_string())),
            "/rename" => match rest.split_once(char::is_whitespace) {
                Some((id, title)) => Command::Rename {
                    id: id.to_string(),
                    title: title.trim().to_string(),
                },
                None => Command::Invalid("usage: /rename <id> <title>".to_string()),
            },
            "/delete" => with_arg(rest, "/delete <id>", |id| Command::Delete(id.to_string())),
            "/agent" => Command::ToggleAgent,
            "/analiz" | "/analysis" => Command::ToggleDeepAnalysis,
            "/search" => Command::ToggleSearch,
            "/models" => Command::Models,
            "/model" => match ModelName::parse(rest) {
                Some(model) => Command::SelectModel(model),
                None => Command::Invalid(format!("unknown model '{rest}', see /models")),
            },
            "/upload" | "/u" => with_arg(rest, "/upload <path>", |path| {
                Command::Upload(PathBuf::from(path))
            }),
            "/regenerate" | "/r" => {
                if rest.is_empty() {
                    Command::Regenerate(None)
                } else {
                    match rest.parse::<usize>() {
                        Ok(index) => Command::Regenerate(Some(index)),
                        Err(_) => Command::Invalid("usage: /regenerate [index]".to_string()),
                    }
                }
            }
            "/edit" | "/e" => match rest.parse::<usize>() {
                Ok(index) => Command::Edit(index),
                Err(_) => Command::Invalid("usage: /edit <index>".to_string()),
            },
            "/help" | "/h" => Command::Help,
            "/quit" | "/exit" | "/q" => Command::Quit,
            other => Command::Invalid(format!("unknown command '{other}', see /help")),
        };

        return Some(command);
    }
}

fn with_arg(rest: &str, usage: &str, build: impl FnOnce(&str) -> Command) -> Command {
    if rest.is_empty() {
        return Command::Invalid(format!("usage: {usage}"));
    }

    return build(rest);
}

/// Index of the newest assistant message, the default target of `/regenerate`.
pub fn last_assistant_index(transcript: &[Message]) -> Option<usize> {
    return transcript.iter().rposition(|message| message.is_assistant());
}

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Start a new chat. Any pending reply is abandoned.
- /sessions (/s) - List chats from today, the last 7 days and the last 30 days.
- /switch [ID] - Open a chat.
- /rename [ID] [TITLE] - Rename a chat.
- /delete [ID] - Delete a chat.
- /agent - Toggle agent mode.
- /analiz - Toggle deep analysis mode.
- /search - Toggle search mode.
- /models - List available models.
- /model [KEY] - Select the model used for new messages.
- /upload (/u) [PATH] - Upload a document to use as context for the current chat.
- /regenerate (/r) [INDEX?] - Ask again for an assistant reply, the newest one by default.
- /edit (/e) [INDEX] - Copy one of your messages back into the input.
- /help (/h) - Provides this help menu.
- /quit /exit (/q) - Exit.

Anything else is sent as a message.
        "#;

    text.trim().to_string()
}
