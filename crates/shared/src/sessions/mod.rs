mod state;
mod store;

pub use state::{ChatRole, ChatSessionState, ChatTurn};
pub use store::{ChatSessionStore, SessionHandle};
