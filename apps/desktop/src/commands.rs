//! Line commands typed at the prompt.

use shared::domain::StoryId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the draft search term.
    Type(String),
    Submit,
    /// `Type` followed by `Submit`.
    Search(String),
    Remove(RemoveTarget),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// 1-based row as printed in the list.
    Position(usize),
    Id(StoryId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'; type 'help' for a list of commands")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a row number or id:<objectID>")]
    InvalidTarget(String),
}

pub const HELP: &str = "\
commands:
  type <text>        edit the search term (saved, not submitted)
  submit             search for the current term
  search <text>      type and submit in one step
  remove <n>         dismiss row n (or remove id:<objectID>)
  list               show the current results
  help               show this help
  quit               exit";

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_start();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line.trim_end(), ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "type" | "t" => Ok(Command::Type(rest.to_string())),
        "submit" | "s" => Ok(Command::Submit),
        "search" | "/" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("search"));
            }
            Ok(Command::Search(rest.to_string()))
        }
        "remove" | "rm" | "x" => parse_remove_target(rest).map(Command::Remove),
        "list" | "ls" | "" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_remove_target(raw: &str) -> Result<RemoveTarget, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument("remove"));
    }
    if let Some(id) = raw.strip_prefix("id:") {
        let id = id.trim();
        if id.is_empty() {
            return Err(CommandError::InvalidTarget(raw.to_string()));
        }
        return Ok(RemoveTarget::Id(StoryId::new(id)));
    }
    match raw.parse::<usize>() {
        Ok(position) if position > 0 => Ok(RemoveTarget::Position(position)),
        _ => Err(CommandError::InvalidTarget(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_keeps_inner_spaces_and_allows_empty() {
        assert_eq!(
            parse_command("type  rust async  ").expect("parse"),
            Command::Type("rust async".to_string())
        );
        assert_eq!(
            parse_command("type").expect("parse"),
            Command::Type(String::new())
        );
    }

    #[test]
    fn search_requires_text() {
        assert_eq!(
            parse_command("search"),
            Err(CommandError::MissingArgument("search"))
        );
        assert_eq!(
            parse_command("SEARCH Redux").expect("parse"),
            Command::Search("Redux".to_string())
        );
    }

    #[test]
    fn remove_accepts_rows_and_ids() {
        assert_eq!(
            parse_command("remove 2").expect("parse"),
            Command::Remove(RemoveTarget::Position(2))
        );
        assert_eq!(
            parse_command("rm id:3912").expect("parse"),
            Command::Remove(RemoveTarget::Id(StoryId::new("3912")))
        );
        assert!(matches!(
            parse_command("remove 0"),
            Err(CommandError::InvalidTarget(_))
        ));
        assert!(matches!(
            parse_command("remove id:"),
            Err(CommandError::InvalidTarget(_))
        ));
        assert_eq!(
            parse_command("remove"),
            Err(CommandError::MissingArgument("remove"))
        );
    }

    #[test]
    fn blank_line_lists() {
        assert_eq!(parse_command("   ").expect("parse"), Command::List);
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert_eq!(
            parse_command("frobnicate now"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }
}
