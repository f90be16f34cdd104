//! Console command grammar.

use core::str::FromStr;

use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetName(String),
    SetCategory(String),
    SetPatrimony(String),
    SetStatus(String),
    Save,
    /// 1-based row in the filtered list.
    Edit(usize),
    Cancel,
    Delete(usize),
    FilterCategory(String),
    FilterStatus(String),
    ClearFilters,
    List,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?} (try \"help\")")]
    Unknown(String),
    #[error("{0} needs a row number")]
    MissingRow(&'static str),
    #[error("invalid row {0:?}")]
    InvalidRow(String),
    #[error("usage: filter category <value> | filter status <value> | filter clear")]
    FilterUsage,
}

pub const HELP: &str = "\
commands:
  name <text>            set the name field
  category <value>       set the category (notebook, projector, camera, other)
  patrimony <text>       set the patrimony tag
  status <value>         disponível | emprestado
  save                   create or update from the form
  edit <row>             load a row into the form
  cancel                 discard the form
  delete <row>           remove a row (asks first)
  filter category <v>    show only one category (empty value clears)
  filter status <v>      show only one status (empty value clears)
  filter clear           drop both filters
  list                   redraw
  help                   this text
  quit                   leave";

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

fn row(verb: &'static str, raw: &str) -> Result<usize, ParseCommandError> {
    if raw.is_empty() {
        return Err(ParseCommandError::MissingRow(verb));
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseCommandError::InvalidRow(raw.to_string())),
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseCommandError::Empty);
        }

        let (verb, rest) = split_word(line);
        let cmd = match verb.to_ascii_lowercase().as_str() {
            // Field values keep their inner spacing; validation trims later.
            "name" => Command::SetName(rest.to_string()),
            "category" => Command::SetCategory(rest.to_string()),
            "patrimony" => Command::SetPatrimony(rest.to_string()),
            "status" => Command::SetStatus(rest.to_string()),
            "save" => Command::Save,
            "edit" => Command::Edit(row("edit", rest)?),
            "cancel" => Command::Cancel,
            "delete" => Command::Delete(row("delete", rest)?),
            "filter" => {
                let (what, value) = split_word(rest);
                match what {
                    "category" => Command::FilterCategory(value.to_string()),
                    "status" => Command::FilterStatus(value.to_string()),
                    "clear" => Command::ClearFilters,
                    _ => return Err(ParseCommandError::FilterUsage),
                }
            }
            "list" | "ls" => Command::List,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }
}
