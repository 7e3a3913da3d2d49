use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ChatSessionState;

const SESSION_ID_LEN: usize = 10;

/// A registered session. The mutex serializes mutation of one
/// conversation (a user double-submitting) without blocking any other
/// session.
pub type SessionHandle = Arc<Mutex<ChatSessionState>>;

/// In-memory session registry keyed by opaque id. Cloning the store is
/// cheap and every clone sees the same sessions.
///
/// Sessions live for the process lifetime; there is no eviction.
#[derive(Clone, Default)]
pub struct ChatSessionStore {
    sessions: Arc<DashMap<String, SessionHandle>>,
}

impl ChatSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self) -> SessionHandle {
        let session_id = generate_session_id();
        let handle: SessionHandle = Arc::new(Mutex::new(ChatSessionState::new(&session_id)));
        self.sessions.insert(session_id, handle.clone());
        handle
    }

    pub fn get_session(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
    }
}

fn generate_session_id() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(SESSION_ID_LEN);
    token
}
