use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::Story, protocol::decode_search_response};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    query::QueryUrl,
    stories::{StoriesAction, StoryStore},
};

#[async_trait]
pub trait StorySource: Send + Sync {
    async fn search(&self, url: &QueryUrl) -> Result<Vec<Story>, FetchError>;
}

/// [`StorySource`] backed by the Algolia Hacker News search API.
#[derive(Clone)]
pub struct HnSearchClient {
    http: Client,
}

impl HnSearchClient {
    pub fn new(request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl StorySource for HnSearchClient {
    async fn search(&self, url: &QueryUrl) -> Result<Vec<Story>, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let res = self
            .http
            .get(url.url().clone())
            .send()
            .await
            .map_err(transport)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }
        let body = res.bytes().await.map_err(transport)?;
        Ok(decode_search_response(&body)?)
    }
}

pub struct MissingStorySource;

#[async_trait]
impl StorySource for MissingStorySource {
    async fn search(&self, _url: &QueryUrl) -> Result<Vec<Story>, FetchError> {
        Err(FetchError::Unavailable(
            "no story source configured".to_string(),
        ))
    }
}

/// What to do with a completion whose request has since been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleResponsePolicy {
    /// Only the most recently started request may update the list.
    #[default]
    LatestRequest,
    /// Every completion is applied in the order it lands.
    LastResolved,
}

impl StaleResponsePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaleResponsePolicy::LatestRequest => "latest_request",
            StaleResponsePolicy::LastResolved => "last_resolved",
        }
    }
}

impl fmt::Display for StaleResponsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaleResponsePolicy {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "latest_request" => Ok(StaleResponsePolicy::LatestRequest),
            "last_resolved" => Ok(StaleResponsePolicy::LastResolved),
            other => Err(anyhow!(
                "unknown stale response policy '{other}' (expected latest_request or last_resolved)"
            )),
        }
    }
}

#[derive(Debug)]
pub struct FetchCompletion {
    pub generation: u64,
    pub url: QueryUrl,
    pub outcome: Result<Vec<Story>, FetchError>,
}

pub type CompletionReceiver = mpsc::UnboundedReceiver<FetchCompletion>;

/// Starts one request per call and reports completions over a channel.
///
/// In-flight requests are never cancelled. Each request is stamped with a generation so
/// [`FetchOrchestrator::resolve`] can apply the configured [`StaleResponsePolicy`].
pub struct FetchOrchestrator {
    source: Arc<dyn StorySource>,
    policy: StaleResponsePolicy,
    generation: u64,
    in_flight: usize,
    completions: mpsc::UnboundedSender<FetchCompletion>,
}

impl FetchOrchestrator {
    pub fn new(
        source: Arc<dyn StorySource>,
        policy: StaleResponsePolicy,
    ) -> (Self, CompletionReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let orchestrator = Self {
            source,
            policy,
            generation: 0,
            in_flight: 0,
            completions: tx,
        };
        (orchestrator, rx)
    }

    pub fn policy(&self) -> StaleResponsePolicy {
        self.policy
    }

    /// Number of requests started so far; also the generation of the latest one.
    pub fn requests_started(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Dispatches `FetchInit` into `store`, then spawns the request. Returns its generation.
    pub fn fetch(&mut self, url: QueryUrl, store: &mut StoryStore) -> u64 {
        store.dispatch(StoriesAction::FetchInit);

        self.generation += 1;
        self.in_flight += 1;
        let generation = self.generation;
        info!(url = %url, generation, "fetching stories");

        let source = Arc::clone(&self.source);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = source.search(&url).await;
            let _ = completions.send(FetchCompletion {
                generation,
                url,
                outcome,
            });
        });

        generation
    }

    /// Maps a completion onto the action it should dispatch, or `None` if the policy drops it.
    pub fn resolve(&mut self, completion: FetchCompletion) -> Option<StoriesAction> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let FetchCompletion {
            generation,
            url,
            outcome,
        } = completion;

        if self.policy == StaleResponsePolicy::LatestRequest && generation != self.generation {
            debug!(
                url = %url,
                generation,
                latest = self.generation,
                "dropping superseded fetch completion"
            );
            return None;
        }

        match outcome {
            Ok(stories) => {
                info!(url = %url, generation, count = stories.len(), "fetched stories");
                Some(StoriesAction::FetchSuccess(stories))
            }
            Err(err) => {
                warn!(url = %url, generation, error = %err, "story fetch failed");
                Some(StoriesAction::FetchFailure)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
