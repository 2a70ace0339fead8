use chrono::{DateTime, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use todo_core::{Item, DATE_FORMAT};

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl ItemRow {
    fn new(index: usize, item: &Item, now: DateTime<Utc>) -> Self {
        let due = match item.due_date {
            Some(d) if item.is_overdue_at(now) => format!("{} (OVERDUE!)", d.format(DATE_FORMAT)),
            Some(d) => d.format(DATE_FORMAT).to_string(),
            None => "-".to_string(),
        };

        Self {
            // 1-based so it can be fed straight back into a command.
            number: index + 1,
            done: if item.done { "✓" } else { "" },
            priority: format!("{} {}", item.priority.symbol(), item.priority),
            text: item.text.clone(),
            due,
            tags: item.tags.join(", "),
        }
    }
}

/// Renders query results; `matches` carries each item's position in the list.
pub fn render_matches(matches: &[(usize, &Item)], now: DateTime<Utc>) -> String {
    let rows: Vec<ItemRow> = matches
        .iter()
        .map(|(index, item)| ItemRow::new(*index, item, now))
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use todo_core::TodoList;

    #[test]
    fn test_rows_use_list_numbers() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let mut list = TodoList::new();
        list.add("first").unwrap();
        list.add("second").unwrap();
        list.set_due_date(1, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .unwrap();
        list.add_tag(1, "home").unwrap();

        let matches = list.search("second");
        let rendered = render_matches(&matches, now);

        assert!(rendered.contains("second"));
        assert!(rendered.contains("2025-06-01 (OVERDUE!)"));
        assert!(rendered.contains("home"));
        assert!(rendered.contains("│ 2 "));
        assert!(!rendered.contains("first"));
    }
}
