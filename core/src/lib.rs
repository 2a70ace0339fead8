pub mod error;
pub mod model;
pub mod render;
pub mod repository;

pub use error::{Result, TodoError};
pub use model::item::{Item, DATE_FORMAT};
pub use model::list::TodoList;
pub use model::priority::Priority;
pub use model::stats::Stats;
pub use render::{render_item, EMPTY_LIST};
pub use repository::{FileListRepository, ListRepository};
pub use repository::file::DEFAULT_FILE_NAME;
