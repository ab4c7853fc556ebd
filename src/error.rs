use thiserror::Error;

/// Result type alias for amoshelf operations
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Errors that can occur during amoshelf operations
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Non-success HTTP status from the collection API
    #[error("Failed to fetch addon collection. Status code: {status} ({url})")]
    Remote { status: u16, url: String },

    /// Connection failure, timeout or other transport problem
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be understood
    #[error("Malformed collection response: {0}")]
    MalformedResponse(String),

    /// Paginated fetch aborted by the caller
    #[error("Fetch cancelled")]
    Cancelled,

    /// Configured page ceiling reached before the server stopped paginating
    #[error("Collection has more than {0} pages")]
    PageLimit(usize),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to write config file: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Record not found in the collection
    #[error("Add-on not found in collection: {0}")]
    RecordNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

impl ShelfError {
    /// Create a remote error from an HTTP status and the URL that produced it
    pub fn remote(status: u16, url: impl Into<String>) -> Self {
        Self::Remote {
            status,
            url: url.into(),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::Env(_) => 2,
            Self::Remote { .. } | Self::Transport(_) | Self::PageLimit(_) => 3,
            Self::MalformedResponse(_) => 4,
            Self::RecordNotFound(_) => 5,
            Self::Cancelled => 130,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message_carries_status() {
        let err = ShelfError::remote(404, "https://example.test/page");
        assert!(err.to_string().contains("Status code: 404"));
        assert!(matches!(err, ShelfError::Remote { status: 404, .. }));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ShelfError::InvalidArgument("x".into()).exit_code(), 2);
        assert_eq!(ShelfError::remote(503, "u").exit_code(), 3);
        assert_eq!(ShelfError::malformed("x").exit_code(), 4);
        assert_eq!(ShelfError::Cancelled.exit_code(), 130);
        assert_eq!(
            ShelfError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")).exit_code(),
            1
        );
    }
}
