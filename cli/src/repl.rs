use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use todo_core::{ListRepository, TodoList};
use tracing::{debug, info};

use crate::command::{self, format_stats, Command};

const PROMPT_COMMANDS: &str =
    "Commands: add, complete, uncomplete, delete, edit, clear, help, quit";

/// Line-oriented loop: show the list, read a command, run it, save if it
/// changed anything. Ends on `quit`/`exit` or end of input.
pub fn run<R, I, O>(repo: &R, list: &mut TodoList, input: I, output: &mut O) -> Result<()>
where
    R: ListRepository,
    I: BufRead,
    O: Write,
{
    info!("starting interactive session");
    let mut lines = input.lines();

    loop {
        writeln!(output, "\n{}", list)?;
        writeln!(output, "\nStats: {}", format_stats(&list.stats()))?;
        writeln!(output, "\n{}", PROMPT_COMMANDS)?;
        write!(output, "\n> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            debug!("end of input");
            break;
        };
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match command::parse_line(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "Error: {}", e)?;
                continue;
            }
        };

        match command::execute(list, command) {
            Ok(outcome) => {
                if outcome.changed {
                    repo.save(list).context("Error saving todos")?;
                }
                writeln!(output, "{}", outcome.message)?;
            }
            Err(e) => writeln!(output, "Error: {}", e)?,
        }
    }

    info!("interactive session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;
    use todo_core::FileListRepository;

    fn session(repo: &FileListRepository, script: &str) -> (TodoList, String) {
        let mut list = repo.load().unwrap();
        let mut output = Vec::new();
        run(repo, &mut list, Cursor::new(script.to_string()), &mut output).unwrap();
        (list, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_session_persists_changes() {
        let dir = TempDir::new().unwrap();
        let repo = FileListRepository::new(dir.path().join("todos.json"));

        let (list, output) =
            session(&repo, "add Task 1\nadd Task 2\ncomplete 1\nquit\nadd never\n");

        assert!(output.contains("Added: Task 1"));
        assert!(output.contains("Marked item as completed"));
        assert_eq!(list.len(), 2);

        let stored = repo.load().unwrap();
        assert_eq!(stored.items()[0].text, "Task 2");
        assert!(stored.items()[1].done);
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let dir = TempDir::new().unwrap();
        let repo = FileListRepository::new(dir.path().join("todos.json"));

        let (list, output) = session(&repo, "complete 9\nbogus\n\nadd still here\nexit\n");

        assert!(output.contains("Error: Item index out of range"));
        assert!(output.contains("Error: Unknown command: 'bogus'"));
        assert_eq!(list.items()[0].text, "still here");
    }

    #[test]
    fn test_read_only_commands_do_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        let repo = FileListRepository::new(&path);

        let (_, output) = session(&repo, "stats\nlist\n");

        assert!(output.contains("Total: 0 | Pending: 0 | Completed: 0"));
        assert!(output.contains("No items to display"));
        assert!(!path.exists());
    }
}
