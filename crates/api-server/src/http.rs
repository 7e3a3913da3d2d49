use axum::Router;
use axum::routing::{get, post};
use shared::gemini::GeminiClient;
use shared::sessions::ChatSessionStore;

mod errors;
mod format;
mod health;
mod search;

#[derive(Clone)]
pub struct AppState {
    pub sessions: ChatSessionStore,
    pub gemini: GeminiClient,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/api/search", get(search::search))
        .route("/api/follow-up", post(search::follow_up))
        .with_state(app_state)
}
