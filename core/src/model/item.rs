use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::priority::Priority;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    #[serde(alias = "Text")]
    pub text: String,
    #[serde(default, alias = "Done")]
    pub done: bool,
    #[serde(default, alias = "Priority")]
    pub priority: Priority,
    #[serde(
        default,
        alias = "DueDate",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_due_date"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default, alias = "Tags", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Builds a pending, medium-priority item. Uniqueness of `text` is the
    /// list's concern, not the item's.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
            priority: Priority::default(),
            due_date: None,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// A due date counts from midnight UTC, so an item due today is already
    /// overdue once the day has started.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) if !self.done => due.and_time(NaiveTime::MIN).and_utc() < now,
            _ => false,
        }
    }

    pub fn matches_query(&self, lowered_query: &str) -> bool {
        self.text.to_lowercase().contains(lowered_query)
            || self
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(lowered_query))
    }
}

// Due dates are stored as YYYY-MM-DD; full RFC 3339 timestamps are accepted
// too and truncated to their date.
fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| serde::de::Error::custom(format!("invalid due date: {}", raw)))
}
