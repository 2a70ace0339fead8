mod command;
mod date;
mod repl;
mod table;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use todo_core::{FileListRepository, ListRepository, Priority, DEFAULT_FILE_NAME};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::command::{item_index, parse_due_change, Command, Filter};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "A command line todo manager", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode (cannot be combined with a subcommand)
    #[arg(short, long)]
    interactive: bool,

    /// Todo file to read and write
    #[arg(short, long, env = "TODO_FILE", global = true)]
    file: Option<PathBuf>,

    /// Use ~/.todo/todos.json instead of a file in the current directory
    #[arg(short, long, global = true)]
    global: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new todo item
    Add {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// List all todo items
    List,
    /// Mark item n as completed
    Complete { number: usize },
    /// Mark item n as incomplete
    Uncomplete { number: usize },
    /// Delete item n
    #[command(alias = "remove")]
    Delete { number: usize },
    /// Edit the text of item n
    Edit {
        number: usize,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Remove all completed items
    Clear,
    /// Show statistics
    Stats,
    /// Set priority (high/medium/low, or h/m/l)
    Priority { number: usize, level: String },
    /// Set due date (YYYY-MM-DD, today, tomorrow, +3d, fri, or none)
    Due { number: usize, date: String },
    /// Add a tag to item n
    Tag { number: usize, tag: String },
    /// Remove a tag from item n
    Untag { number: usize, tag: String },
    /// Search tasks by text or tag
    Search {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Show overdue tasks
    Overdue,
    /// Show tasks with a given priority or tag
    Filter {
        #[arg(long, conflicts_with = "tag", required_unless_present = "tag")]
        priority: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Move completed items to the bottom
    Sort,
    /// Run in interactive mode
    Interactive,
}

impl Commands {
    /// `None` means the interactive loop was asked for.
    fn into_command(self) -> Result<Option<Command>> {
        let command = match self {
            Commands::Add { text } => Command::Add(text.join(" ")),
            Commands::List => Command::List,
            Commands::Complete { number } => Command::Complete(item_index(number)?),
            Commands::Uncomplete { number } => Command::Uncomplete(item_index(number)?),
            Commands::Delete { number } => Command::Delete(item_index(number)?),
            Commands::Edit { number, text } => Command::Edit(item_index(number)?, text.join(" ")),
            Commands::Clear => Command::Clear,
            Commands::Stats => Command::Stats,
            Commands::Priority { number, level } => {
                Command::Priority(item_index(number)?, Priority::parse_lenient(&level))
            }
            Commands::Due { number, date } => {
                Command::Due(item_index(number)?, parse_due_change(&date)?)
            }
            Commands::Tag { number, tag } => Command::Tag(item_index(number)?, tag),
            Commands::Untag { number, tag } => Command::Untag(item_index(number)?, tag),
            Commands::Search { query } => Command::Search(query.join(" ")),
            Commands::Overdue => Command::Overdue,
            Commands::Filter { priority, tag } => match (priority, tag) {
                (Some(level), _) => Command::Filter(Filter::Priority(level.parse()?)),
                (None, Some(tag)) => Command::Filter(Filter::Tag(tag)),
                (None, None) => anyhow::bail!("Give either --priority or --tag"),
            },
            Commands::Sort => Command::Sort,
            Commands::Interactive => return Ok(None),
        };
        Ok(Some(command))
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn repository(cli: &Cli) -> Result<FileListRepository> {
    if cli.global {
        return FileListRepository::in_home().context("Failed to prepare ~/.todo");
    }
    let path = cli
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
    Ok(FileListRepository::new(path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.interactive && cli.command.is_some() {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "--interactive cannot be used with a subcommand",
            )
            .exit();
    }
    init_logging(cli.verbose);

    let repo = repository(&cli)?;
    debug!(path = %repo.path().display(), "using todo file");
    let mut list = repo.load().context("Error loading todos")?;

    let command = match cli.command {
        None if cli.interactive => None,
        // Default action: print the list
        None => Some(Command::List),
        Some(sub) => sub.into_command()?,
    };

    let Some(command) = command else {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        return repl::run(&repo, &mut list, stdin.lock(), &mut stdout);
    };

    let outcome = command::execute(&mut list, command)?;
    if outcome.changed {
        repo.save(&list).context("Error saving todos")?;
    }
    println!("{}", outcome.message);
    Ok(())
}
