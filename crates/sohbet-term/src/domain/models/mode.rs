use strum_macros::Display;

/// Input affordance currently offered to the user. At most one special mode
/// is active; `Chat` means none of them is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum InputMode {
    #[default]
    Chat,
    Agent,
    DeepAnalysis,
    Search,
}

impl InputMode {
    pub fn placeholder(&self) -> &'static str {
        match self {
            InputMode::Chat => "Mesajınızı yazın...",
            InputMode::Agent => "Ajanla sohbet edin...",
            InputMode::DeepAnalysis => "Muhakeme et...",
            InputMode::Search => "Aramak istediğiniz konuyu yazın...",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Composing,
    Sending,
}

/// How the most recent top-level submission ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum SubmissionOutcome {
    Received,
    Cancelled,
    Failed,
}
