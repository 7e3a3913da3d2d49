use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shared::gemini::GeminiError;
use shared::models::{ErrorBody, ErrorResponse};
use tracing::{error, warn};

pub(super) fn bad_request_response(code: &str, message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        }),
    )
        .into_response()
}

pub(super) fn session_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: ErrorBody {
                code: "session_not_found".to_string(),
                message: "Chat session not found".to_string(),
            },
        }),
    )
        .into_response()
}

fn bad_gateway_response(code: &str, message: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        }),
    )
        .into_response()
}

fn rate_limited_response(retry_after_seconds: Option<u64>) -> Response {
    let message = match retry_after_seconds {
        Some(seconds) => format!("Rate limit/quota exceeded. Retry in ~{seconds}s."),
        None => "Rate limit/quota exceeded. Please retry shortly.".to_string(),
    };

    let mut body = json!({
        "error": {
            "code": "rate_limited",
            "message": message,
        }
    });
    if let Some(seconds) = retry_after_seconds {
        body["retryAfterSeconds"] = json!(seconds);
    }

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    if let Some(seconds) = retry_after_seconds
        && let Ok(retry_after_value) = HeaderValue::from_str(&seconds.to_string())
    {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, retry_after_value);
    }

    response
}

pub(super) fn gemini_error_response(err: GeminiError, operation: &str) -> Response {
    match err {
        GeminiError::MissingApiKey => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: ErrorBody {
                    code: "missing_api_key".to_string(),
                    message: "Set GOOGLE_API_KEY or GEMINI_API_KEY in your .env or environment"
                        .to_string(),
                },
            }),
        )
            .into_response(),
        GeminiError::RateLimited {
            retry_after_seconds,
        } => {
            warn!("{operation} rate limited by upstream, retry hint {retry_after_seconds:?}");
            rate_limited_response(retry_after_seconds)
        }
        GeminiError::UpstreamStatus { status } => {
            error!("{operation} upstream request failed with status {status}");
            bad_gateway_response(
                "upstream_failure",
                &format!("Generate request failed (status {status})"),
            )
        }
        other => {
            error!("{operation} upstream request failed: {other}");
            bad_gateway_response("upstream_failure", "Generate request failed")
        }
    }
}
