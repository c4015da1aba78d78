//! Plain-text rendering of the story list, shared by the terminal front end and tests.

use shared::domain::Story;

use crate::stories::StoriesState;

pub const LOADING_MESSAGE: &str = "Loading ...";
pub const ERROR_MESSAGE: &str = "Something went wrong ...";
pub const EMPTY_MESSAGE: &str = "No stories.";

const TITLE_WIDTH: usize = 48;
const AUTHOR_WIDTH: usize = 16;

pub fn render_stories(state: &StoriesState) -> Vec<String> {
    let mut lines = Vec::new();
    if state.is_error {
        lines.push(ERROR_MESSAGE.to_string());
    }
    if state.is_loading {
        lines.push(LOADING_MESSAGE.to_string());
        return lines;
    }
    if state.data.is_empty() {
        lines.push(EMPTY_MESSAGE.to_string());
        return lines;
    }

    lines.push(format!(
        "{:>3}  {:<TITLE_WIDTH$}  {:<AUTHOR_WIDTH$}  {:>8}  {:>6}",
        "#", "title", "author", "comments", "points"
    ));
    lines.extend(
        state
            .data
            .iter()
            .enumerate()
            .flat_map(|(index, story)| render_row(index + 1, story)),
    );
    lines
}

/// One summary line plus, when present, an indented link line.
pub fn render_row(position: usize, story: &Story) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>3}  {:<TITLE_WIDTH$}  {:<AUTHOR_WIDTH$}  {:>8}  {:>6}",
        position,
        truncate(&story.title, TITLE_WIDTH),
        truncate(&story.author, AUTHOR_WIDTH),
        story.num_comments,
        story.points
    )];
    if !story.url.is_empty() {
        lines.push(format!("     {}", story.url));
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
