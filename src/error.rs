use thiserror::Error;

/// Every failed call surfaces as this one error, carrying a message fit to show the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Builds the error for a non-success response from its raw body.
    pub fn from_body(body: &str, fallback: &str) -> Self {
        Self::new(server_message(body).unwrap_or_else(|| fallback.to_string()))
    }
}

fn server_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    json.get("message")
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_server_message_when_present() {
        let err = ApiError::from_body(r#"{"message":"Budget already exists"}"#, "Failed to create budget");
        assert_eq!(err.to_string(), "Budget already exists");
    }

    #[test]
    fn falls_back_on_missing_field() {
        let err = ApiError::from_body(r#"{"error":"nope"}"#, "Failed to create budget");
        assert_eq!(err.message, "Failed to create budget");
    }

    #[test]
    fn falls_back_on_non_json_body() {
        let err = ApiError::from_body("<html>502 Bad Gateway</html>", "Failed to fetch deposits");
        assert_eq!(err.message, "Failed to fetch deposits");

        let err = ApiError::from_body("", "Failed to delete expense");
        assert_eq!(err.message, "Failed to delete expense");
    }

    #[test]
    fn falls_back_on_blank_or_non_string_message() {
        assert_eq!(ApiError::from_body(r#"{"message":"  "}"#, "x").message, "x");
        assert_eq!(ApiError::from_body(r#"{"message":42}"#, "y").message, "y");
    }
}
