use shared::error::ProtocolError;
use thiserror::Error;

/// Why a search request failed. The session collapses every variant into a single
/// fetch-failure transition; the distinction only reaches the logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("search endpoint returned status {status}")]
    Status { status: reqwest::StatusCode },
    #[error(transparent)]
    Decode(#[from] ProtocolError),
    #[error("story source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum QueryUrlError {
    #[error("invalid search endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("search term produced an invalid url '{raw}': {source}")]
    InvalidQuery {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Query(#[from] QueryUrlError),
    #[error("failed to persist search term: {0:#}")]
    Persist(anyhow::Error),
    #[error("no story with id {0} in the current result set")]
    UnknownStory(String),
}
