use thiserror::Error;

#[derive(Error, Debug)]
pub enum MindsyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    RemoteFormat(String),

    /// The detail endpoint answered with no entities; the content is gone or private.
    #[error("No entities returned by {url}")]
    EmptyDetail { url: String },

    #[error("Malformed store at line {line}: {reason}")]
    StoreFormat { line: usize, reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MindsyncError>;
