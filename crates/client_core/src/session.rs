//! Search session: the single place where user intents and fetch completions meet the state.

use std::sync::Arc;

use shared::domain::{Story, StoryId};
use tracing::{debug, info};

use crate::{
    error::SearchError,
    fetch::{CompletionReceiver, FetchCompletion, FetchOrchestrator, StaleResponsePolicy, StorySource},
    query::{QueryUrl, SearchEndpoint},
    search_term::{KeyValueStore, PersistedSearchTerm, DEFAULT_SEARCH_TERM, SEARCH_TERM_KEY},
    stories::{StoriesAction, StoriesState, StoryStore},
};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: SearchEndpoint,
    pub storage_key: String,
    pub default_search_term: String,
    pub stale_responses: StaleResponsePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: SearchEndpoint::default(),
            storage_key: SEARCH_TERM_KEY.to_string(),
            default_search_term: DEFAULT_SEARCH_TERM.to_string(),
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new request was started with this generation.
    Started { generation: u64 },
    /// The draft matches the committed search; nothing was fetched.
    Unchanged,
    /// Submitting is disabled while the draft is blank.
    EmptyTerm,
}

pub struct SearchSession {
    store: StoryStore,
    term: PersistedSearchTerm,
    endpoint: SearchEndpoint,
    committed: QueryUrl,
    orchestrator: FetchOrchestrator,
}

impl SearchSession {
    /// Loads the persisted term, commits it, and starts the initial fetch.
    pub async fn open(
        config: SessionConfig,
        source: Arc<dyn StorySource>,
        kv: Arc<dyn KeyValueStore>,
    ) -> Result<(Self, CompletionReceiver), SearchError> {
        let term = PersistedSearchTerm::load(kv, config.storage_key, config.default_search_term)
            .await
            .map_err(SearchError::Persist)?;
        let committed = config.endpoint.query_url(term.value())?;
        let (orchestrator, completions) = FetchOrchestrator::new(source, config.stale_responses);

        let mut session = Self {
            store: StoryStore::new(),
            term,
            endpoint: config.endpoint,
            committed,
            orchestrator,
        };
        info!(
            term = %session.term.value(),
            policy = %session.orchestrator.policy(),
            "opened search session"
        );
        session
            .orchestrator
            .fetch(session.committed.clone(), &mut session.store);
        Ok((session, completions))
    }

    pub fn state(&self) -> &StoriesState {
        self.store.state()
    }

    pub fn draft(&self) -> &str {
        self.term.value()
    }

    pub fn committed_url(&self) -> &QueryUrl {
        &self.committed
    }

    pub fn requests_started(&self) -> u64 {
        self.orchestrator.requests_started()
    }

    pub fn can_submit(&self) -> bool {
        !self.term.value().trim().is_empty()
    }

    /// Replaces the draft and persists it. Never starts a request.
    pub async fn input(&mut self, text: impl Into<String>) -> Result<(), SearchError> {
        self.term.set(text).await.map_err(SearchError::Persist)
    }

    /// Commits the draft; a request starts only if the derived URL differs from the committed one.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SearchError> {
        if !self.can_submit() {
            debug!("ignoring submit with blank search term");
            return Ok(SubmitOutcome::EmptyTerm);
        }

        let url = self.endpoint.query_url(self.term.value())?;
        if url == self.committed {
            debug!(url = %url, "search term unchanged; not refetching");
            return Ok(SubmitOutcome::Unchanged);
        }

        self.committed = url;
        let generation = self
            .orchestrator
            .fetch(self.committed.clone(), &mut self.store);
        Ok(SubmitOutcome::Started { generation })
    }

    /// Removes `story` from the current results; returns whether anything was removed.
    pub fn remove(&mut self, story: &Story) -> bool {
        let before = self.store.state().data.len();
        let after = self
            .store
            .dispatch(StoriesAction::RemoveStory(story.clone()))
            .data
            .len();
        before != after
    }

    pub fn remove_by_id(&mut self, id: &StoryId) -> Result<Story, SearchError> {
        let story = self
            .store
            .find(id)
            .cloned()
            .ok_or_else(|| SearchError::UnknownStory(id.to_string()))?;
        self.remove(&story);
        Ok(story)
    }

    /// Applies a completion from the receiver returned by [`SearchSession::open`].
    /// Returns whether the state changed.
    pub fn apply_completion(&mut self, completion: FetchCompletion) -> bool {
        match self.orchestrator.resolve(completion) {
            Some(action) => {
                self.store.dispatch(action);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
