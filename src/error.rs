use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("page load timed out after {0}s")]
    Timeout(u64),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("no {0} in document")]
    MissingMarkup(&'static str),

    #[error("can't parse timestamp {0:?}")]
    Timestamp(String),

    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
