//! Client core for searching Hacker News stories: reducer-driven result state, a persisted
//! search term, and request orchestration against the search API.

pub mod error;
pub mod fetch;
pub mod query;
pub mod search_term;
pub mod session;
pub mod stories;
pub mod view;

pub use error::{FetchError, QueryUrlError, SearchError};
pub use fetch::{
    CompletionReceiver, FetchCompletion, FetchOrchestrator, HnSearchClient, MissingStorySource,
    StaleResponsePolicy, StorySource,
};
pub use query::{QueryUrl, SearchEndpoint, DEFAULT_ENDPOINT};
pub use search_term::{
    KeyValueStore, MemoryKeyValueStore, PersistedSearchTerm, DEFAULT_SEARCH_TERM, SEARCH_TERM_KEY,
};
pub use session::{SearchSession, SessionConfig, SubmitOutcome};
pub use stories::{stories_reducer, StoriesAction, StoriesState, StoryStore};
