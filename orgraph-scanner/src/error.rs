use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Registry returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// HTTP status associated with the failure, or 0 when no response was received.
    pub fn status_code(&self) -> u16 {
        match self {
            ScanError::HttpError(e) => e.status().map(|s| s.as_u16()).unwrap_or(0),
            ScanError::Status { code, .. } => *code,
            _ => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_from_status_variant() {
        let err = ScanError::Status {
            code: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status_code(), 404);
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_status_code_defaults_to_zero() {
        assert_eq!(
            ScanError::MalformedIdentifier("12".to_string()).status_code(),
            0
        );
        assert_eq!(ScanError::Other("boom".to_string()).status_code(), 0);
    }
}
