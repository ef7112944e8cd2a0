//! Error for a single download attempt, kept typed so the retry policy can classify it.

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to disk failed. Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
