pub mod file;
pub mod traits;

// Re-export
pub use file::FileListRepository;
pub use traits::ListRepository;
