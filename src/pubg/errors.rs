use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-200 answer from the remote API
    #[error("Remote API error {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether a later attempt at the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Remote { status, .. } => *status == 429 || *status >= 500,
            ApiError::Transport(_) => true,
            ApiError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        let too_many = ApiError::Remote {
            status: 429,
            body: String::new(),
        };
        let unavailable = ApiError::Remote {
            status: 503,
            body: String::new(),
        };
        assert!(too_many.is_transient());
        assert!(unavailable.is_transient());
        assert!(ApiError::Transport("timed out".into()).is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        let not_found = ApiError::Remote {
            status: 404,
            body: "{\"errors\":[]}".into(),
        };
        assert!(!not_found.is_transient());
        assert!(!ApiError::Decode("missing field".into()).is_transient());
    }
}
