use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use shared::models::{FollowUpRequest, FollowUpResponse, SearchResponse};

use super::AppState;
use super::errors::{bad_request_response, gemini_error_response, session_not_found_response};
use super::format::normalize_markdown;

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

pub(super) async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
    else {
        return bad_request_response("missing_query", "Query parameter 'q' is required");
    };

    let session = state.sessions.create_session();
    let mut session = session.lock().await;

    match state.gemini.generate_first_answer(query, &mut session).await {
        Ok(result) => Json(SearchResponse {
            session_id: session.session_id().to_string(),
            summary: normalize_markdown(&result.text),
            sources: result.sources,
        })
        .into_response(),
        Err(err) => gemini_error_response(err, "search"),
    }
}

pub(super) async fn follow_up(
    State(state): State<AppState>,
    Json(request): Json<FollowUpRequest>,
) -> Response {
    let session_id = request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let (Some(session_id), Some(query)) = (session_id, query) else {
        return bad_request_response("missing_fields", "Both sessionId and query are required");
    };

    let Some(session) = state.sessions.get_session(session_id) else {
        return session_not_found_response();
    };
    let mut session = session.lock().await;

    match state.gemini.generate_follow_up(query, &mut session).await {
        Ok(result) => Json(FollowUpResponse {
            summary: normalize_markdown(&result.text),
            sources: result.sources,
        })
        .into_response(),
        Err(err) => gemini_error_response(err, "follow-up"),
    }
}
