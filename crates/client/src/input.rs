//! Terminal command parsing
//!
//! Rows are addressed by the number shown next to them in the current view.

use todo_core::todo::Filter;

use crate::controller::{Command, TodoState};
use crate::view::rows;

pub const HELP: &str = "\
commands:
  add <title>        create a todo
  toggle <n>         flip completion of row n
  delete <n>         delete row n
  filter <all|active|completed>
  list               redraw
  help               show this text
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Run(Vec<Command>),
    Redraw,
    Help,
    Quit,
}

/// Parse one input line against the rows currently on screen
pub fn parse_line(line: &str, state: &TodoState) -> Result<Action, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" | "list" | "ls" => Ok(Action::Redraw),
        "help" | "?" => Ok(Action::Help),
        "quit" | "exit" | "q" => Ok(Action::Quit),
        "add" => {
            if rest.is_empty() {
                return Err("usage: add <title>".to_string());
            }
            Ok(Action::Run(vec![
                Command::SetDraft(rest.to_string()),
                Command::SubmitCreate,
            ]))
        }
        "toggle" | "t" => Ok(Action::Run(vec![Command::Toggle(row_id(rest, state)?)])),
        "delete" | "rm" => Ok(Action::Run(vec![Command::Delete(row_id(rest, state)?)])),
        "filter" => {
            let filter = rest.parse::<Filter>()?;
            Ok(Action::Run(vec![Command::SetFilter(filter)]))
        }
        other => Err(format!("unknown command `{other}`, try `help`")),
    }
}

fn row_id(raw: &str, state: &TodoState) -> Result<String, String> {
    let number: usize = raw
        .parse()
        .map_err(|_| format!("expected a row number, got `{raw}`"))?;
    rows(state)
        .into_iter()
        .find(|row| row.number == number)
        .map(|row| row.id.to_string())
        .ok_or_else(|| format!("no row {number}"))
}
