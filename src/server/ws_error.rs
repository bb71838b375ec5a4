//! Centralized helpers for WebSocket error responses.
//!
//! Use these helpers to ensure all error messages are consistent, explicit,
//! and include a code and context.

/// Formats a WebSocket error message as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_REQUEST").
/// - `message`: Human-readable error message.
/// - `context`: Optional context (e.g. player_id, room_id).
pub fn ws_error_message(code: &str, message: &str, context: Option<&str>) -> String {
    let context_str = context.unwrap_or("");
    format!(
        r#"{{"type":"error","code":"{}","message":"{}","context":"{}"}}"#,
        code, message, context_str
    )
}
