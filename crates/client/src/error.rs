use thiserror::Error;

/// Failures talking to the product or media APIs.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to build http client: {0}")]
    Builder(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("file lookup failed: {0}")]
    Lookup(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
