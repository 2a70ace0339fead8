pub mod item;
pub mod list;
pub mod priority;
pub mod stats;
