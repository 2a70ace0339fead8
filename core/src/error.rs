//! Error types for the todo core.

use std::path::PathBuf;

use thiserror::Error;

/// Everything a list operation or a load/save can fail with.
#[derive(Error, Debug)]
pub enum TodoError {
    // Validation errors
    #[error("Item already exists in the list: '{text}'")]
    DuplicateItem { text: String },

    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("Tag already exists: '{tag}'")]
    DuplicateTag { tag: String },

    #[error("Tag not found: '{tag}'")]
    TagNotFound { tag: String },

    #[error("Invalid priority: '{input}' (expected high, medium or low)")]
    InvalidPriority { input: String },

    // Range errors
    #[error("Item index out of range (list has {len} item(s))")]
    IndexOutOfRange { index: usize, len: usize },

    // Storage errors
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode todo list: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, TodoError>;
