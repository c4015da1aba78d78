//! Story list state and the reducer that owns every transition of it.

use shared::domain::{Story, StoryId};

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct StoriesState {
    pub data: Vec<Story>,
    pub is_loading: bool,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoriesAction {
    FetchInit,
    FetchSuccess(Vec<Story>),
    FetchFailure,
    RemoveStory(Story),
}

impl StoriesAction {
    pub fn name(&self) -> &'static str {
        match self {
            StoriesAction::FetchInit => "fetch_init",
            StoriesAction::FetchSuccess(_) => "fetch_success",
            StoriesAction::FetchFailure => "fetch_failure",
            StoriesAction::RemoveStory(_) => "remove_story",
        }
    }
}

/// Pure transition function: the input state is never modified.
pub fn stories_reducer(state: &StoriesState, action: StoriesAction) -> StoriesState {
    match action {
        StoriesAction::FetchInit => StoriesState {
            data: state.data.clone(),
            is_loading: true,
            is_error: false,
        },
        StoriesAction::FetchSuccess(payload) => StoriesState {
            data: payload,
            is_loading: false,
            is_error: false,
        },
        StoriesAction::FetchFailure => StoriesState {
            data: state.data.clone(),
            is_loading: false,
            is_error: true,
        },
        StoriesAction::RemoveStory(item) => StoriesState {
            data: state
                .data
                .iter()
                .filter(|story| !story.same_identity(&item))
                .cloned()
                .collect(),
            is_loading: state.is_loading,
            is_error: state.is_error,
        },
    }
}

/// Holds the current snapshot; every change goes through [`StoryStore::dispatch`].
#[derive(Default, Debug, Clone)]
pub struct StoryStore {
    state: StoriesState,
}

impl StoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: StoriesState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &StoriesState {
        &self.state
    }

    pub fn dispatch(&mut self, action: StoriesAction) -> &StoriesState {
        tracing::debug!(action = action.name(), "dispatching stories action");
        self.state = stories_reducer(&self.state, action);
        &self.state
    }

    pub fn find(&self, id: &StoryId) -> Option<&Story> {
        self.state.data.iter().find(|story| &story.object_id == id)
    }
}

#[cfg(test)]
#[path = "tests/stories_tests.rs"]
mod tests;
