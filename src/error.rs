use reqwest::StatusCode;

/// Why a single unit of work (one page, one app) produced no record.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("unexpected response shape: {0}")]
    Shape(String),
    /// The store answered but has nothing for this id.
    #[error("not found")]
    NotFound,
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Shape(e.to_string())
    }
}
