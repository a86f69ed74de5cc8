//! Plain-text rendering of the list view

use std::fmt::{self, Write};

use todo_core::todo::Filter;

use crate::controller::TodoState;

const FILTERS: [(Filter, &str); 3] = [
    (Filter::All, "All"),
    (Filter::Active, "Active"),
    (Filter::Completed, "Completed"),
];

/// One visible row, numbered from 1 in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<'a> {
    pub number: usize,
    pub id: &'a str,
    pub title: &'a str,
    pub completed: bool,
    /// This row's mutation is in flight
    pub busy: bool,
    /// Controls are disabled because some mutation is in flight
    pub disabled: bool,
}

pub fn rows(state: &TodoState) -> Vec<RowView<'_>> {
    let disabled = state.is_mutating();
    state
        .visible()
        .into_iter()
        .enumerate()
        .map(|(i, todo)| RowView {
            number: i + 1,
            id: &todo.id,
            title: &todo.title,
            completed: todo.completed,
            busy: state.busy_id() == Some(todo.id.as_str()),
            disabled,
        })
        .collect()
}

pub fn render(state: &TodoState) -> String {
    ListView(state).to_string()
}

/// Displays the whole list view for a state
pub struct ListView<'a>(pub &'a TodoState);

impl fmt::Display for ListView<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_view(out, self.0)
    }
}

fn write_view(out: &mut impl fmt::Write, state: &TodoState) -> fmt::Result {
    writeln!(out, "Todos")?;
    writeln!(out, "Add items, mark them complete, and delete them.")?;
    writeln!(out)?;

    let button = if state.is_creating() { "Adding…" } else { "Add" };
    let draft = if state.draft().is_empty() {
        "What needs doing?"
    } else {
        state.draft()
    };
    writeln!(out, "> {draft}  [{button}]")?;

    if let Some(message) = state.error_message() {
        writeln!(out, "! Something went wrong")?;
        writeln!(out, "! {message}")?;
    }

    let meta = if state.is_initial_loading() {
        "Loading…".to_string()
    } else {
        format!("{} remaining", state.remaining())
    };
    let tabs = FILTERS
        .iter()
        .map(|(filter, label)| {
            if *filter == state.filter() {
                format!("[{label}]")
            } else {
                label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{meta}  {tabs}")?;
    writeln!(out)?;

    if state.is_initial_loading() {
        return Ok(());
    }

    let rows = rows(state);
    if rows.is_empty() {
        writeln!(out, "No todos yet.")?;
        return Ok(());
    }

    for row in rows {
        let check = if row.completed { "x" } else { " " };
        write!(out, "{:>3}. [{check}] {}", row.number, row.title)?;
        if row.busy {
            write!(out, "  (Deleting…)")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
