use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use crate::model::item::{Item, DATE_FORMAT};
use crate::model::list::TodoList;

pub const EMPTY_LIST: &str = "No items to display";
const HEADER: &str = "TODO List:";

impl TodoList {
    /// Renders the list as it looks at `now`; overdue markers depend on it.
    pub fn render_at(&self, now: DateTime<Utc>) -> String {
        if self.is_empty() {
            return EMPTY_LIST.to_string();
        }

        let mut out = String::from(HEADER);
        out.push('\n');
        for (i, item) in self.items().iter().enumerate() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{}", render_item(i + 1, item, now));
        }
        out
    }
}

impl fmt::Display for TodoList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_at(Utc::now()))
    }
}

/// One numbered line: marker, priority symbol, text, due date and tags.
pub fn render_item(number: usize, item: &Item, now: DateTime<Utc>) -> String {
    let status = if item.done { "✓" } else { " " };
    let mut line = format!(
        "{}. [{}] {} {}",
        number,
        status,
        item.priority.symbol(),
        item.text
    );

    if let Some(due) = item.due_date {
        line.push_str(&format!(" 📅 {}", due.format(DATE_FORMAT)));
        if item.is_overdue_at(now) {
            line.push_str(" (OVERDUE!)");
        }
    }

    if !item.tags.is_empty() {
        line.push_str(&format!(" 🏷️  {}", item.tags.join(", ")));
    }

    line
}
