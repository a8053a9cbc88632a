use thiserror::Error;

/// Failure modes surfaced by the API client.
///
/// Transport-level failures (server down, CORS, DNS) carry no HTTP status and
/// collapse into `NetworkUnavailable`; anything the server actually answered
/// with a non-2xx status becomes `RequestFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    #[error("Network error - check if API server is running")]
    NetworkUnavailable { cause: String },
}

impl ApiError {
    /// HTTP status of the failure, with 0 standing in for "never reached
    /// the server".
    pub fn status(&self) -> u16 {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
            ApiError::NetworkUnavailable { .. } => 0,
        }
    }
}

/// Builds a `RequestFailed` from a non-2xx response, preferring the backend's
/// `detail` field over a generic status line.
pub fn error_from_response(status: u16, status_text: &str, body: &str) -> ApiError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        });

    let message = detail.unwrap_or_else(|| format!("HTTP {status}: {status_text}"));
    ApiError::RequestFailed { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_field_becomes_message() {
        let err = error_from_response(404, "Not Found", r#"{"detail":"Entity not found"}"#);
        assert_eq!(
            err,
            ApiError::RequestFailed {
                status: 404,
                message: "Entity not found".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Entity not found");
    }

    #[test]
    fn non_json_body_falls_back_to_status_line() {
        let err = error_from_response(502, "Bad Gateway", "<html>upstream error</html>");
        assert_eq!(
            err,
            ApiError::RequestFailed {
                status: 502,
                message: "HTTP 502: Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn missing_detail_falls_back_to_status_line() {
        let err = error_from_response(500, "Internal Server Error", r#"{"error":"boom"}"#);
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn network_error_has_fixed_message_and_zero_status() {
        let err = ApiError::NetworkUnavailable {
            cause: "failed to fetch".to_string(),
        };
        assert_eq!(err.status(), 0);
        assert_eq!(
            err.to_string(),
            "Network error - check if API server is running"
        );
    }
}
