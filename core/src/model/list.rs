use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{Result, TodoError};
use crate::model::item::Item;
use crate::model::priority::Priority;
use crate::model::stats::Stats;

/// An ordered, index-addressed collection of items.
///
/// Order matters: every operation that targets one item takes its zero-based
/// position. Completed items are moved behind pending ones only by
/// [`complete`](Self::complete), [`uncomplete`](Self::uncomplete) and
/// [`sort`](Self::sort); other mutations leave the order alone.
///
/// The `items` key is required when decoding. Files written with capitalised
/// keys (`Items`, `Text`, ...) are read as well.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TodoList {
    #[serde(alias = "Items", deserialize_with = "deserialize_items")]
    items: Vec<Item>,
}

/// `null` is how an emptied list was stored by the capitalised format.
fn deserialize_items<'de, D>(deserializer: D) -> std::result::Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Item>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut Item> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(TodoError::IndexOutOfRange { index, len })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(TodoError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    // --- Mutations ---

    pub fn add(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        if text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        if self.items.iter().any(|i| i.text == text) {
            return Err(TodoError::DuplicateItem { text });
        }
        debug!(text = %text, "adding item");
        self.items.push(Item::new(text));
        Ok(())
    }

    pub fn complete(&mut self, index: usize) -> Result<()> {
        self.item_mut(index)?.done = true;
        debug!(index, "completed item");
        self.sort();
        Ok(())
    }

    pub fn uncomplete(&mut self, index: usize) -> Result<()> {
        self.item_mut(index)?.done = false;
        debug!(index, "reopened item");
        self.sort();
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<Item> {
        self.check_index(index)?;
        debug!(index, "deleting item");
        Ok(self.items.remove(index))
    }

    /// Replaces the text in place. Uniqueness is only enforced by `add`, so an
    /// edit may produce a duplicate.
    pub fn edit(&mut self, index: usize, new_text: impl Into<String>) -> Result<()> {
        let new_text = new_text.into();
        let item = self.item_mut(index)?;
        if new_text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        debug!(index, text = %new_text, "editing item");
        item.text = new_text;
        Ok(())
    }

    pub fn set_priority(&mut self, index: usize, priority: Priority) -> Result<()> {
        self.item_mut(index)?.priority = priority;
        debug!(index, %priority, "set priority");
        Ok(())
    }

    pub fn set_due_date(&mut self, index: usize, due: NaiveDate) -> Result<()> {
        self.item_mut(index)?.due_date = Some(due);
        debug!(index, %due, "set due date");
        Ok(())
    }

    pub fn clear_due_date(&mut self, index: usize) -> Result<()> {
        self.item_mut(index)?.due_date = None;
        debug!(index, "cleared due date");
        Ok(())
    }

    pub fn add_tag(&mut self, index: usize, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        let item = self.item_mut(index)?;
        if item.has_tag(&tag) {
            return Err(TodoError::DuplicateTag { tag });
        }
        debug!(index, tag = %tag, "adding tag");
        item.tags.push(tag);
        Ok(())
    }

    pub fn remove_tag(&mut self, index: usize, tag: &str) -> Result<()> {
        let item = self.item_mut(index)?;
        let pos = item
            .tags
            .iter()
            .position(|t| t == tag)
            .ok_or_else(|| TodoError::TagNotFound {
                tag: tag.to_string(),
            })?;
        item.tags.remove(pos);
        debug!(index, tag, "removed tag");
        Ok(())
    }

    /// Drops every completed item and returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|i| !i.done);
        let removed = before - self.items.len();
        debug!(removed, "cleared completed items");
        removed
    }

    /// Stable partition: pending items first, completed last, each group in
    /// its previous relative order.
    pub fn sort(&mut self) {
        self.items.sort_by_key(|i| i.done);
    }

    // --- Queries ---

    pub fn stats(&self) -> Stats {
        Stats::from_items(&self.items)
    }

    /// Case-insensitive substring match on the text or any tag.
    pub fn search(&self, query: &str) -> Vec<(usize, &Item)> {
        let query = query.to_lowercase();
        self.select(|i| i.matches_query(&query))
    }

    pub fn filter_by_priority(&self, priority: Priority) -> Vec<(usize, &Item)> {
        self.select(|i| i.priority == priority)
    }

    /// Exact, case-sensitive tag match.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<(usize, &Item)> {
        self.select(|i| i.has_tag(tag))
    }

    pub fn overdue(&self) -> Vec<(usize, &Item)> {
        self.overdue_at(Utc::now())
    }

    pub fn overdue_at(&self, now: DateTime<Utc>) -> Vec<(usize, &Item)> {
        self.select(|i| i.is_overdue_at(now))
    }

    fn select<F>(&self, predicate: F) -> Vec<(usize, &Item)>
    where
        F: Fn(&Item) -> bool,
    {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| predicate(*item))
            .collect()
    }
}
