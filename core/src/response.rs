//! Normalized responses returned by every verb call.
//!
//! # Design
//! The API's JSON is passed through untouched on success. Everything else
//! (error statuses, non-JSON bodies, transport failures) gets its own variant
//! so callers match exhaustively instead of probing for an `error` key.
//! `ApiResponse::to_json` renders the flat mapping shape for callers that
//! print or forward results.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::http::HttpResponse;

/// Message used when an error response carries no usable message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Status < 400 with a JSON body, returned verbatim.
    Success(Value),

    /// Status < 400 with a body that is not JSON.
    Content(String),

    /// Status >= 400. `details` holds the decoded body when it was JSON.
    ApiError {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// No response was received.
    RequestFailed(String),
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_) | ApiResponse::Content(_))
    }

    /// The flat mapping shape: the body itself on success, `{content}` for
    /// text, `{error, message, details?}` for error statuses and
    /// `{error: "Request failed: ..."}` for transport failures.
    pub fn to_json(&self) -> Value {
        match self {
            ApiResponse::Success(value) => value.clone(),
            ApiResponse::Content(text) => json!({ "content": text }),
            ApiResponse::ApiError {
                status,
                message,
                details: Some(details),
            } => json!({
                "error": format!("HTTP {status}"),
                "message": message,
                "details": details,
            }),
            ApiResponse::ApiError {
                status,
                message,
                details: None,
            } => json!({
                "error": format!("HTTP {status}"),
                "message": message,
            }),
            ApiResponse::RequestFailed(reason) => json!({ "error": format!("Request failed: {reason}") }),
        }
    }
}

impl Serialize for ApiResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Shape a transport response into an `ApiResponse`.
///
/// The body is decoded as JSON regardless of its declared content type.
pub fn normalize(response: &HttpResponse) -> ApiResponse {
    let is_error = response.status >= 400;

    match serde_json::from_str::<Value>(&response.body) {
        Ok(decoded) if is_error => ApiResponse::ApiError {
            status: response.status,
            message: error_message(&decoded),
            details: Some(decoded),
        },
        Ok(decoded) => ApiResponse::Success(decoded),
        Err(_) if is_error => ApiResponse::ApiError {
            status: response.status,
            message: if response.body.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                response.body.clone()
            },
            details: None,
        },
        Err(_) => ApiResponse::Content(response.body.clone()),
    }
}

fn error_message(decoded: &Value) -> String {
    match decoded.get("message") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => UNKNOWN_ERROR.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_success_passes_through() {
        let response = HttpResponse::new(200, r#"{"status":"success","data":[1,2,3]}"#);
        let normalized = normalize(&response);
        assert_eq!(normalized, ApiResponse::Success(json!({"status": "success", "data": [1, 2, 3]})));
        assert_eq!(normalized.to_json(), json!({"status": "success", "data": [1, 2, 3]}));
    }

    #[test]
    fn json_array_success_passes_through() {
        let normalized = normalize(&HttpResponse::new(201, "[1,2]"));
        assert_eq!(normalized.to_json(), json!([1, 2]));
    }

    #[test]
    fn json_error_carries_message_and_details() {
        let normalized = normalize(&HttpResponse::new(404, r#"{"message":"Not found"}"#));
        assert_eq!(
            normalized,
            ApiResponse::ApiError {
                status: 404,
                message: "Not found".to_string(),
                details: Some(json!({"message": "Not found"})),
            }
        );
        assert_eq!(
            normalized.to_json(),
            json!({"error": "HTTP 404", "message": "Not found", "details": {"message": "Not found"}})
        );
    }

    #[test]
    fn json_error_without_message_is_unknown() {
        let normalized = normalize(&HttpResponse::new(500, r#"{"code":17}"#));
        assert_eq!(
            normalized.to_json(),
            json!({"error": "HTTP 500", "message": "Unknown error", "details": {"code": 17}})
        );
    }

    #[test]
    fn json_error_with_non_object_body_is_unknown() {
        let normalized = normalize(&HttpResponse::new(400, r#"["bad"]"#));
        assert!(matches!(
            normalized,
            ApiResponse::ApiError { ref message, .. } if message == UNKNOWN_ERROR
        ));
    }

    #[test]
    fn json_error_with_non_string_message_uses_its_json_text() {
        let normalized = normalize(&HttpResponse::new(422, r#"{"message":["a","b"]}"#));
        assert!(matches!(
            normalized,
            ApiResponse::ApiError { ref message, .. } if message == r#"["a","b"]"#
        ));
    }

    #[test]
    fn text_success_is_wrapped_as_content() {
        let normalized = normalize(&HttpResponse::new(200, "Plain text response"));
        assert_eq!(normalized, ApiResponse::Content("Plain text response".to_string()));
        assert_eq!(normalized.to_json(), json!({"content": "Plain text response"}));
    }

    #[test]
    fn empty_success_body_is_empty_content() {
        assert_eq!(normalize(&HttpResponse::new(204, "")), ApiResponse::Content(String::new()));
    }

    #[test]
    fn text_error_uses_body_as_message() {
        let normalized = normalize(&HttpResponse::new(502, "Bad Gateway"));
        assert_eq!(normalized.to_json(), json!({"error": "HTTP 502", "message": "Bad Gateway"}));
    }

    #[test]
    fn empty_error_body_is_unknown() {
        let normalized = normalize(&HttpResponse::new(403, ""));
        assert_eq!(normalized.to_json(), json!({"error": "HTTP 403", "message": "Unknown error"}));
    }

    #[test]
    fn status_399_is_not_an_error() {
        assert!(normalize(&HttpResponse::new(399, "{}")).is_success());
        assert!(!normalize(&HttpResponse::new(400, "{}")).is_success());
    }

    #[test]
    fn serializes_as_flat_mapping() {
        let normalized = normalize(&HttpResponse::new(404, r#"{"message":"Not found"}"#));
        assert_eq!(
            serde_json::to_string(&normalized).unwrap(),
            serde_json::to_string(&normalized.to_json()).unwrap()
        );
    }

    #[test]
    fn request_failed_renders_reason() {
        let failed = ApiResponse::RequestFailed("Connection refused".to_string());
        assert_eq!(failed.to_json(), json!({"error": "Request failed: Connection refused"}));
        assert!(!failed.is_success());
    }
}
