//! The command layer shared by the one-shot CLI and the interactive loop:
//! turn user input into a [`Command`], run it against a list, describe the
//! result.

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate, Utc};
use todo_core::{Priority, Stats, TodoList};

use crate::date::parse_due_date;
use crate::table::render_matches;

#[derive(Debug, Clone, PartialEq)]
pub enum DueChange {
    Set(NaiveDate),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Priority(Priority),
    Tag(String),
}

/// One operation on the list. Indices are already zero-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(String),
    List,
    Complete(usize),
    Uncomplete(usize),
    Delete(usize),
    Edit(usize, String),
    Clear,
    Stats,
    Priority(usize, Priority),
    Due(usize, DueChange),
    Tag(usize, String),
    Untag(usize, String),
    Search(String),
    Overdue,
    Filter(Filter),
    Sort,
    Help,
    Quit,
}

/// What a command printed and whether the list needs saving.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub message: String,
    pub changed: bool,
}

impl Outcome {
    fn changed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            changed: true,
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            changed: false,
        }
    }
}

pub const HELP: &str = "\
Available commands:
  add <text>              Add a new todo item
  list                    List all todo items
  complete <n>            Mark item n as completed
  uncomplete <n>          Mark item n as incomplete
  delete <n>              Delete item n (alias: remove)
  edit <n> <text>         Edit the text of item n
  clear                   Remove all completed items
  stats                   Show statistics
  priority <n> <level>    Set priority (high/medium/low)
  due <n> <date>          Set due date (YYYY-MM-DD, today, +3d, fri, none)
  tag <n> <tag>           Add a tag to item n
  untag <n> <tag>         Remove a tag from item n
  search <query>          Search tasks by text or tag
  overdue                 Show overdue tasks
  filter priority <level> Show tasks with the given priority
  filter tag <tag>        Show tasks carrying the given tag
  sort                    Move completed tasks to the bottom
  help                    Show this help message
  quit                    Exit the program

Commands may be abbreviated to any unique prefix (e.g. 'comp 1').";

const COMMAND_NAMES: &[&str] = &[
    "add", "list", "complete", "uncomplete", "delete", "remove", "edit", "clear", "stats",
    "priority", "due", "tag", "untag", "search", "overdue", "filter", "sort", "help", "quit",
    "exit",
];

/// Resolves a command word: exact match first, then a unique prefix.
pub fn expand_command<'a>(word: &str, candidates: &[&'a str]) -> Result<&'a str> {
    if let Some(&exact) = candidates.iter().find(|&&c| c == word) {
        return Ok(exact);
    }

    let matches: Vec<&'a str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(word))
        .copied()
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(anyhow!("Unknown command: '{}' - type 'help' for available commands", word)),
        _ => Err(anyhow!("Ambiguous command: '{}' matches {:?}", word, matches)),
    }
}

/// Converts a user-facing 1-based item number into a list index.
pub fn item_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Invalid item number: {} (numbering starts at 1)", number))
}

fn parse_item_number(raw: &str) -> Result<usize> {
    let number: usize = raw
        .parse()
        .map_err(|_| anyhow!("Invalid item number: {}", raw))?;
    item_index(number)
}

pub fn parse_due_change(raw: &str) -> Result<DueChange> {
    match raw.to_lowercase().as_str() {
        "none" | "clear" => Ok(DueChange::Clear),
        _ => Ok(DueChange::Set(parse_due_date(raw, Local::now().date_naive())?)),
    }
}

/// Parses one line typed into the interactive loop.
pub fn parse_line(line: &str) -> Result<Command> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&word, args)) = parts.split_first() else {
        bail!("Empty command");
    };

    let name = expand_command(&word.to_lowercase(), COMMAND_NAMES)?;
    let rest = |from: usize| args[from..].join(" ");

    let command = match name {
        "add" => {
            if args.is_empty() {
                bail!("Missing todo text");
            }
            Command::Add(rest(0))
        }
        "list" => Command::List,
        "complete" => Command::Complete(parse_item_number(required(args, 0, "item number")?)?),
        "uncomplete" => Command::Uncomplete(parse_item_number(required(args, 0, "item number")?)?),
        "delete" | "remove" => {
            Command::Delete(parse_item_number(required(args, 0, "item number")?)?)
        }
        "edit" => {
            let index = parse_item_number(required(args, 0, "item number")?)?;
            required(args, 1, "new text")?;
            Command::Edit(index, rest(1))
        }
        "clear" => Command::Clear,
        "stats" => Command::Stats,
        "priority" => {
            let index = parse_item_number(required(args, 0, "item number")?)?;
            let level = required(args, 1, "priority level")?;
            Command::Priority(index, Priority::parse_lenient(level))
        }
        "due" => {
            let index = parse_item_number(required(args, 0, "item number")?)?;
            Command::Due(index, parse_due_change(required(args, 1, "due date")?)?)
        }
        "tag" => {
            let index = parse_item_number(required(args, 0, "item number")?)?;
            Command::Tag(index, required(args, 1, "tag")?.to_string())
        }
        "untag" => {
            let index = parse_item_number(required(args, 0, "item number")?)?;
            Command::Untag(index, required(args, 1, "tag")?.to_string())
        }
        "search" => {
            if args.is_empty() {
                bail!("Missing search query");
            }
            Command::Search(rest(0))
        }
        "overdue" => Command::Overdue,
        "filter" => {
            let kind = required(args, 0, "filter kind (priority or tag)")?;
            let value = required(args, 1, "filter value")?;
            match expand_command(kind, &["priority", "tag"])? {
                "priority" => Command::Filter(Filter::Priority(value.parse()?)),
                _ => Command::Filter(Filter::Tag(value.to_string())),
            }
        }
        "sort" => Command::Sort,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("Unknown command: '{}'", other),
    };

    Ok(command)
}

fn required<'a>(args: &[&'a str], at: usize, what: &str) -> Result<&'a str> {
    args.get(at)
        .copied()
        .ok_or_else(|| anyhow!("Missing {}", what))
}

pub fn format_stats(stats: &Stats) -> String {
    format!(
        "Total: {} | Pending: {} | Completed: {}",
        stats.total, stats.pending, stats.completed
    )
}

/// Runs `command` against `list`. Core errors come back untouched so the
/// caller decides whether to stop or carry on.
pub fn execute(list: &mut TodoList, command: Command) -> Result<Outcome> {
    let outcome = match command {
        Command::Add(text) => {
            list.add(text.as_str())?;
            Outcome::changed(format!("Added: {}", text))
        }
        Command::List => Outcome::unchanged(list.to_string()),
        Command::Complete(index) => {
            list.complete(index)?;
            Outcome::changed("Marked item as completed")
        }
        Command::Uncomplete(index) => {
            list.uncomplete(index)?;
            Outcome::changed("Marked item as incomplete")
        }
        Command::Delete(index) => {
            let removed = list.delete(index)?;
            Outcome::changed(format!("Deleted: {}", removed.text))
        }
        Command::Edit(index, text) => {
            list.edit(index, text)?;
            Outcome::changed("Updated item")
        }
        Command::Clear => {
            let count = list.clear_completed();
            Outcome::changed(format!("Cleared {} completed item(s)", count))
        }
        Command::Stats => Outcome::unchanged(format_stats(&list.stats())),
        Command::Priority(index, priority) => {
            list.set_priority(index, priority)?;
            Outcome::changed(format!("Set priority to {}", priority))
        }
        Command::Due(index, DueChange::Set(date)) => {
            list.set_due_date(index, date)?;
            Outcome::changed(format!("Set due date to {}", date.format(todo_core::DATE_FORMAT)))
        }
        Command::Due(index, DueChange::Clear) => {
            list.clear_due_date(index)?;
            Outcome::changed("Cleared due date")
        }
        Command::Tag(index, tag) => {
            list.add_tag(index, tag.as_str())?;
            Outcome::changed(format!("Added tag: {}", tag))
        }
        Command::Untag(index, tag) => {
            list.remove_tag(index, &tag)?;
            Outcome::changed(format!("Removed tag: {}", tag))
        }
        Command::Search(query) => {
            let found = list.search(&query);
            if found.is_empty() {
                Outcome::unchanged("No items found")
            } else {
                Outcome::unchanged(format!(
                    "Found {} item(s):\n{}",
                    found.len(),
                    render_matches(&found, Utc::now())
                ))
            }
        }
        Command::Overdue => {
            let found = list.overdue();
            if found.is_empty() {
                Outcome::unchanged("No overdue items")
            } else {
                Outcome::unchanged(format!(
                    "Overdue items ({}):\n{}",
                    found.len(),
                    render_matches(&found, Utc::now())
                ))
            }
        }
        Command::Filter(filter) => {
            let found = match &filter {
                Filter::Priority(p) => list.filter_by_priority(*p),
                Filter::Tag(tag) => list.filter_by_tag(tag),
            };
            if found.is_empty() {
                Outcome::unchanged("No items found")
            } else {
                Outcome::unchanged(render_matches(&found, Utc::now()))
            }
        }
        Command::Sort => {
            list.sort();
            Outcome::changed("Sorted: completed items moved to the bottom")
        }
        Command::Help => Outcome::unchanged(HELP),
        Command::Quit => Outcome::unchanged(""),
    };

    Ok(outcome)
}
