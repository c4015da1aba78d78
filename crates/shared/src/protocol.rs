use serde::{Deserialize, Serialize};

use crate::{domain::Story, error::ProtocolError};

/// Body of `GET {endpoint}{term}`; only `hits` is consumed, other fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<Story>,
}

pub fn decode_search_response(body: &[u8]) -> Result<Vec<Story>, ProtocolError> {
    let response: SearchResponse = serde_json::from_slice(body)?;
    Ok(response.hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_server_order_and_ignores_extra_fields() {
        let body = br#"{
            "hits": [
                {"objectID":"b","title":"second"},
                {"objectID":"a","title":"first"}
            ],
            "nbHits": 2,
            "page": 0
        }"#;
        let hits = decode_search_response(body).expect("decode");
        let ids: Vec<_> = hits.iter().map(|s| s.object_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn missing_hits_is_malformed() {
        let err = decode_search_response(br#"{"results":[]}"#).expect_err("must fail");
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(decode_search_response(b"<html>busy</html>").is_err());
    }
}
