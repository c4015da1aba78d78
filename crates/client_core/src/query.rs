use std::fmt;

use url::{form_urlencoded, Url};

use crate::error::QueryUrlError;

pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search?query=";

/// Search endpoint prefix; the encoded term is appended verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEndpoint {
    prefix: String,
}

impl SearchEndpoint {
    pub fn new(prefix: impl Into<String>) -> Result<Self, QueryUrlError> {
        let prefix = prefix.into();
        Url::parse(&prefix).map_err(|source| QueryUrlError::InvalidEndpoint {
            endpoint: prefix.clone(),
            source,
        })?;
        Ok(Self { prefix })
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    pub fn query_url(&self, term: &str) -> Result<QueryUrl, QueryUrlError> {
        let encoded: String = form_urlencoded::byte_serialize(term.as_bytes()).collect();
        let raw = format!("{}{}", self.prefix, encoded);
        let url = Url::parse(&raw).map_err(|source| QueryUrlError::InvalidQuery {
            raw: raw.clone(),
            source,
        })?;
        Ok(QueryUrl {
            url,
            term: term.to_string(),
        })
    }
}

impl Default for SearchEndpoint {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// The committed search: the term as submitted and the URL derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryUrl {
    url: Url,
    term: String,
}

impl QueryUrl {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

impl fmt::Display for QueryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
