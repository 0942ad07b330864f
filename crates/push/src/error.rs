//! Push error types.

/// Errors produced while staging or pushing project changes.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] fieldsync_transfer::TransferError),

    /// Transport or server failure; carries the raw response body when
    /// one was available.
    #[error("server error: {0}")]
    Remote(String),

    #[error("no session for project: {0}")]
    SessionNotFound(String),

    #[error("upload already running for project: {0}")]
    SessionActive(String),

    #[error("no staged changes for project: {0}")]
    NotStaged(String),

    #[error("cancelled")]
    Cancelled,
}

impl PushError {
    /// Best-effort user-facing message.
    ///
    /// Server error bodies are often JSON with a `detail` field; when
    /// one can be extracted it is used verbatim, otherwise the raw body
    /// stands in, and an empty body falls back to a generic message.
    pub fn user_detail(&self) -> String {
        match self {
            PushError::Remote(body) => {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
                    && let Some(detail) = value.get("detail").and_then(|d| d.as_str())
                {
                    return detail.to_string();
                }
                if body.is_empty() {
                    "upload failed".to_string()
                } else {
                    body.clone()
                }
            }
            other => other.to_string(),
        }
    }
}
