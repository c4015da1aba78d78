//! Terminal front end: reads commands from stdin and renders the session after each change.

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use client_core::{
    view::render_stories, CompletionReceiver, SearchError, SearchSession, SubmitOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::commands::{parse_command, Command, RemoveTarget, HELP};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue { message: Option<String>, render: bool },
    Quit,
}

impl Flow {
    fn render() -> Self {
        Flow::Continue {
            message: None,
            render: true,
        }
    }

    fn message(message: impl Into<String>) -> Self {
        Flow::Continue {
            message: Some(message.into()),
            render: false,
        }
    }
}

pub async fn execute(session: &mut SearchSession, command: Command) -> Result<Flow, SearchError> {
    match command {
        Command::Type(text) => {
            session.input(text).await?;
            Ok(Flow::Continue {
                message: None,
                render: false,
            })
        }
        Command::Submit => submit(session),
        Command::Search(text) => {
            session.input(text).await?;
            submit(session)
        }
        Command::Remove(RemoveTarget::Position(position)) => {
            let row = position.checked_sub(1);
            let Some(story) = row.and_then(|i| session.state().data.get(i)).cloned() else {
                return Ok(Flow::message(format!("no row {position}")));
            };
            session.remove(&story);
            Ok(Flow::render())
        }
        Command::Remove(RemoveTarget::Id(id)) => {
            session.remove_by_id(&id)?;
            Ok(Flow::render())
        }
        Command::List => Ok(Flow::render()),
        Command::Help => Ok(Flow::message(HELP)),
        Command::Quit => Ok(Flow::Quit),
    }
}

fn submit(session: &mut SearchSession) -> Result<Flow, SearchError> {
    match session.submit()? {
        SubmitOutcome::Started { .. } => Ok(Flow::render()),
        SubmitOutcome::Unchanged => Ok(Flow::message(format!(
            "already showing results for '{}'",
            session.committed_url().term()
        ))),
        SubmitOutcome::EmptyTerm => Ok(Flow::message("type a search term first")),
    }
}

fn render(session: &SearchSession) {
    println!();
    for line in render_stories(session.state()) {
        println!("{line}");
    }
}

fn prompt(session: &SearchSession) -> Result<()> {
    print!("Search: {}> ", session.draft());
    std::io::stdout().flush().context("failed to flush stdout")
}

/// Runs until `quit` or end of input. Fetch completions are applied as they arrive.
pub async fn run_interactive(
    mut session: SearchSession,
    mut completions: CompletionReceiver,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("My Hacker Stories (type 'help' for commands)");
    render(&session);
    prompt(&session)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    println!();
                    break;
                };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{err}");
                        prompt(&session)?;
                        continue;
                    }
                };
                match execute(&mut session, command).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue { message, render: should_render }) => {
                        if let Some(message) = message {
                            println!("{message}");
                        }
                        if should_render {
                            render(&session);
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "command failed");
                        println!("{err}");
                    }
                }
                prompt(&session)?;
            }
            Some(completion) = completions.recv() => {
                if session.apply_completion(completion) {
                    render(&session);
                    prompt(&session)?;
                }
            }
        }
    }

    Ok(())
}

/// Waits for the startup fetch, prints the result and returns. Fails if the fetch failed.
pub async fn run_once(mut session: SearchSession, mut completions: CompletionReceiver) -> Result<()> {
    while session.state().is_loading {
        let completion = completions
            .recv()
            .await
            .ok_or_else(|| anyhow!("fetch completion channel closed"))?;
        session.apply_completion(completion);
    }
    render(&session);

    if session.state().is_error {
        return Err(anyhow!(
            "failed to fetch stories for '{}'",
            session.committed_url().term()
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
