//! Line commands typed at the prompt.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("'{0}' is not a positive number")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sort(String),
    Page(usize),
    First,
    Prev,
    Next,
    Last,
    Limit(usize),
    Filter { key: String, value: String },
    Clear(String),
    Search(String),
    Reset,
    Add,
    Edit(String),
    Delete(String),
    Set { field: String, value: String },
    Submit,
    Escape,
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "\
sort <column>            cycle sort order
page <n> | first | prev | next | last
limit <n>                rows per page
filter <key> <value>     set a filter (range keys: <column>From, <column>To)
clear <key>              clear a filter
search [term]            search; no term clears it
reset                    clear search and filters
add | edit <id> | delete <id>
set <field> <value>      fill a form field
submit | esc
refresh                  refetch ignoring the cache
quit";

impl Command {
    /// Parses one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "sort" => Self::Sort(required(rest, "sort", "a column")?.to_string()),
            "page" => Self::Page(number(required(rest, "page", "a page number")?)?),
            "first" => Self::First,
            "prev" => Self::Prev,
            "next" => Self::Next,
            "last" => Self::Last,
            "limit" => Self::Limit(number(required(rest, "limit", "a page size")?)?),
            "filter" => {
                let (key, value) = pair(rest, "filter", "a key and a value")?;
                Self::Filter { key, value }
            }
            "clear" => Self::Clear(required(rest, "clear", "a filter key")?.to_string()),
            "search" => Self::Search(rest.to_string()),
            "reset" => Self::Reset,
            "add" => Self::Add,
            "edit" => Self::Edit(required(rest, "edit", "a record id")?.to_string()),
            "delete" => Self::Delete(required(rest, "delete", "a record id")?.to_string()),
            "set" => {
                let (field, value) = pair(rest, "set", "a field and a value")?;
                Self::Set { field, value }
            }
            "submit" | "save" => Self::Submit,
            "esc" | "escape" | "cancel" => Self::Escape,
            "refresh" => Self::Refresh,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn required<'a>(rest: &'a str, command: &'static str, argument: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

/// Splits `key value...`; the value may be empty.
fn pair(rest: &str, command: &'static str, argument: &'static str) -> Result<(String, String), CommandError> {
    let rest = required(rest, command, argument)?;
    let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Ok((key.to_string(), value.trim().to_string()))
}

fn number(text: &str) -> Result<usize, CommandError> {
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidNumber(text.to_string())),
    }
}
