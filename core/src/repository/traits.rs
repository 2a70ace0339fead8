use crate::error::Result;
use crate::model::list::TodoList;

/// Where a list lives between invocations.
pub trait ListRepository {
    fn load(&self) -> Result<TodoList>;
    fn save(&self, list: &TodoList) -> Result<()>;
}
