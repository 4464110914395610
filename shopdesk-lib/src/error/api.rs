//! API error types

/// Errors that can occur while talking to the REST backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        /// Backend `message` if the body carried one, else the raw body.
        message: String,
    },

    /// Network error during the call, including timeouts.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Base URL or path could not be turned into a request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response body did not have the expected shape.
    #[error("Response parse error: {message}")]
    Parse {
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Build an HTTP error from a status and response body.
    ///
    /// Backend error bodies look like `{"message": "..."}`; the message is
    /// lifted out when present.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);
        Self::Http { status, message }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// HTTP status code, if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` for 401/403, i.e. the session token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_lifts_backend_message() {
        let err = ApiError::http(422, r#"{"message":"Name already exists","status":422}"#);
        assert_eq!(err.to_string(), "HTTP 422: Name already exists");
        assert_eq!(err.status_code(), Some(422));
    }

    #[test]
    fn test_http_keeps_plain_body() {
        let err = ApiError::http(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
        assert!(!err.is_unauthorized());
        assert!(ApiError::http(401, "").is_unauthorized());
        assert!(ApiError::http(404, "").is_not_found());
        assert!(!ApiError::parse("bad json").is_not_found());
    }
}
