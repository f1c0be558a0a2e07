//! Terminal client for a retrieval-augmented chat backend.
//!
//! Keeps a list of chat sessions, sends messages and documents to the
//! backend's HTTP endpoints and renders replies, with agent, deep analysis
//! and search input modes.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::ui::start_loop;
pub use configuration::{Config, ConfigKey};
pub use domain::models::{
    Action, ChatBackend, ChatError, ChatReply, ChatRequest, ChatSession, Event, Message,
    ModelName, Role,
};
pub use domain::services::{markup, AppState, AppStateProps, Sessions};
pub use infrastructure::clients::BackendManager;
