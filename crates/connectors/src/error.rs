use thiserror::Error;

/// Failure of a round trip to the breed data source.
///
/// `code` carries the HTTP status when the server answered with something
/// other than `200 OK`; it is `None` for transport failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Network error{}: {message}", .code.map(|c| format!(" (status {c})")).unwrap_or_default())]
pub struct NetworkError {
    pub code: Option<u16>,
    pub message: String,
}

impl NetworkError {
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            code: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status_when_present() {
        assert_eq!(
            NetworkError::status(404, "Not Found").to_string(),
            "Network error (status 404): Not Found"
        );
        assert_eq!(
            NetworkError::transport("connection refused").to_string(),
            "Network error: connection refused"
        );
    }
}
