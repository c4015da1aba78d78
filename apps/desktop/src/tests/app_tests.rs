use super::*;
use std::sync::Arc;

use async_trait::async_trait;
use client_core::{
    FetchError, KeyValueStore, MemoryKeyValueStore, QueryUrl, SessionConfig, StorySource,
    SEARCH_TERM_KEY,
};
use shared::domain::{Story, StoryId};

use crate::commands::parse_command;

fn story(id: &str) -> Story {
    Story {
        object_id: StoryId::new(id),
        title: format!("story {id}"),
        url: String::new(),
        author: "pg".to_string(),
        num_comments: 0,
        points: 0,
    }
}

/// Returns three stories for any term except "fail".
struct FixedSource;

#[async_trait]
impl StorySource for FixedSource {
    async fn search(&self, url: &QueryUrl) -> Result<Vec<Story>, FetchError> {
        if url.term() == "fail" {
            return Err(FetchError::Unavailable("scripted failure".to_string()));
        }
        Ok(vec![story("a"), story("b"), story("c")])
    }
}

async fn loaded_session() -> (SearchSession, CompletionReceiver, Arc<MemoryKeyValueStore>) {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let (mut session, mut completions) =
        SearchSession::open(SessionConfig::default(), Arc::new(FixedSource), kv.clone())
            .await
            .expect("open");
    let completion = completions.recv().await.expect("completion");
    session.apply_completion(completion);
    (session, completions, kv)
}

async fn run(session: &mut SearchSession, line: &str) -> Flow {
    let command = parse_command(line).expect("parse");
    execute(session, command).await.expect("execute")
}

#[tokio::test]
async fn typing_persists_without_fetching() {
    let (mut session, _completions, kv) = loaded_session().await;

    let flow = run(&mut session, "type Redux").await;
    assert_eq!(
        flow,
        Flow::Continue {
            message: None,
            render: false
        }
    );
    assert_eq!(session.requests_started(), 1);
    assert_eq!(
        kv.get(SEARCH_TERM_KEY).await.expect("get"),
        Some("Redux".to_string())
    );
}

#[tokio::test]
async fn search_commits_and_fetches() {
    let (mut session, mut completions, _kv) = loaded_session().await;

    assert_eq!(run(&mut session, "search fail").await, Flow::render());
    assert_eq!(session.requests_started(), 2);
    assert!(session.state().is_loading);

    let completion = completions.recv().await.expect("completion");
    session.apply_completion(completion);
    assert!(session.state().is_error);
    assert_eq!(session.state().data.len(), 3);
}

#[tokio::test]
async fn resubmitting_reports_unchanged() {
    let (mut session, _completions, _kv) = loaded_session().await;
    let flow = run(&mut session, "submit").await;
    assert_eq!(
        flow,
        Flow::message("already showing results for 'React'")
    );
}

#[tokio::test]
async fn blank_submit_is_refused() {
    let (mut session, _completions, _kv) = loaded_session().await;
    run(&mut session, "type").await;
    assert_eq!(
        run(&mut session, "submit").await,
        Flow::message("type a search term first")
    );
    assert_eq!(session.requests_started(), 1);
}

#[tokio::test]
async fn remove_by_row_and_id() {
    let (mut session, _completions, _kv) = loaded_session().await;

    assert_eq!(run(&mut session, "remove 2").await, Flow::render());
    let ids: Vec<_> = session
        .state()
        .data
        .iter()
        .map(|s| s.object_id.as_str().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "c"]);

    assert_eq!(
        run(&mut session, "remove 9").await,
        Flow::message("no row 9")
    );

    run(&mut session, "remove id:a").await;
    assert_eq!(session.state().data, vec![story("c")]);

    let err = execute(&mut session, parse_command("remove id:a").expect("parse"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SearchError::UnknownStory(_)));
}

#[tokio::test]
async fn help_and_quit() {
    let (mut session, _completions, _kv) = loaded_session().await;
    assert_eq!(run(&mut session, "help").await, Flow::message(HELP));
    assert_eq!(run(&mut session, "quit").await, Flow::Quit);
}

#[tokio::test]
async fn run_once_fails_when_startup_fetch_fails() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let config = SessionConfig {
        default_search_term: "fail".to_string(),
        ..SessionConfig::default()
    };
    let (session, completions) = SearchSession::open(config, Arc::new(FixedSource), kv)
        .await
        .expect("open");

    let err = run_once(session, completions).await.expect_err("must fail");
    assert!(err.to_string().contains("'fail'"));
}

#[tokio::test]
async fn run_once_succeeds_after_loading() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let (session, completions) =
        SearchSession::open(SessionConfig::default(), Arc::new(FixedSource), kv)
            .await
            .expect("open");
    run_once(session, completions).await.expect("run once");
}
