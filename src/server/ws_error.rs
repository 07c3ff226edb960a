/// Centralized helpers for WebSocket and HTTP error responses.
///
/// Every error frame carries a stable code, a human-readable message and a context
/// (usually the game id).
use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

use crate::server::game_session::messages::ServerMessage;

/// Formats a WebSocket error message as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_ACTION").
/// - `message`: Human-readable error message (in English).
/// - `context`: Optional context (e.g. game_id).
pub fn ws_error_message(code: &str, message: &str, context: Option<&str>) -> String {
    serde_json::to_string(&ServerMessage::error(code, message, context)).unwrap_or_else(|_| {
        r#"{"action":"Error","data":{"code":"INTERNAL","message":"Internal server error","context":""}}"#
            .to_string()
    })
}

/// Returns an HTTP error response with a JSON body.
///
/// # Arguments
/// - `code`: Unique error code.
/// - `message`: Human-readable error message.
/// - `context`: Optional context string.
/// - `status`: HTTP status code.
pub fn http_error_response(
    code: &str,
    message: &str,
    context: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    let body = json!({
        "error": {
            "code": code,
            "message": message,
            "context": context.unwrap_or(""),
        }
    });
    HttpResponse::build(status).json(body)
}
