use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One message in a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Per-conversation state: the ordered turn history replayed to the
/// upstream API on every call, plus the sticky tools flag.
///
/// `tools_enabled` starts true and only flips to false when the first
/// call succeeds via the no-tools fallback; follow-ups reuse whatever
/// the flag says.
#[derive(Debug)]
pub struct ChatSessionState {
    session_id: String,
    tools_enabled: bool,
    history: Vec<ChatTurn>,
}

impl ChatSessionState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            tools_enabled: true,
            history: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn tools_enabled(&self) -> bool {
        self.tools_enabled
    }

    pub fn set_tools_enabled(&mut self, tools_enabled: bool) {
        self.tools_enabled = tools_enabled;
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.history.push(ChatTurn {
            role: ChatRole::User,
            text: text.into(),
        });
    }

    pub fn add_model_message(&mut self, text: impl Into<String>) {
        self.history.push(ChatTurn {
            role: ChatRole::Model,
            text: text.into(),
        });
    }
}
