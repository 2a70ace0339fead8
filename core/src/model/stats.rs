use serde::Serialize;

use crate::model::item::Item;

/// Counts derived from a list on demand; never stored.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Stats {
    pub fn from_items(items: &[Item]) -> Self {
        let completed = items.iter().filter(|i| i.done).count();
        Self {
            total: items.len(),
            completed,
            pending: items.len() - completed,
        }
    }
}
