use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TodoError};
use crate::model::list::TodoList;
use crate::repository::traits::ListRepository;

pub const DEFAULT_FILE_NAME: &str = "todos.json";
const HOME_DIR_NAME: &str = ".todo";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> TodoError + '_ {
    move |source| TodoError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl TodoList {
    /// Overwrites `path` with the whole list in one write. There is no
    /// temp-file staging, so a failed write may leave a truncated file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_vec_pretty(self).map_err(TodoError::Encode)?;
        fs::write(path, data).map_err(io_error(path))?;
        info!(path = %path.display(), items = self.len(), "saved todo list");
        Ok(())
    }

    /// Replaces the contents of `self` with the list stored at `path`.
    /// `self` is only touched once the whole file decoded successfully.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        *self = Self::from_file(path)?;
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(io_error(path))?;
        let reader = BufReader::new(file);
        let list: TodoList = serde_json::from_reader(reader).map_err(|source| TodoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), items = list.len(), "loaded todo list");
        Ok(list)
    }
}

#[derive(Clone, Debug)]
pub struct FileListRepository {
    file_path: PathBuf,
}

impl FileListRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// `~/.todo/todos.json`, creating the directory if needed.
    pub fn in_home() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or(TodoError::NoHomeDir)?;
        let dir = home_dir.join(HOME_DIR_NAME);
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;
        Ok(Self::new(dir.join(DEFAULT_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl ListRepository for FileListRepository {
    /// A missing file is a fresh, empty list.
    fn load(&self) -> Result<TodoList> {
        if !self.file_path.exists() {
            debug!(path = %self.file_path.display(), "no todo file yet, starting empty");
            return Ok(TodoList::new());
        }
        TodoList::from_file(&self.file_path)
    }

    fn save(&self, list: &TodoList) -> Result<()> {
        list.save(&self.file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::priority::Priority;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_list() -> TodoList {
        let mut list = TodoList::new();
        list.add("Write tests").unwrap();
        list.add("Ship it").unwrap();
        list.add("Celebrate").unwrap();
        list.set_priority(0, Priority::High).unwrap();
        list.set_due_date(0, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
            .unwrap();
        list.add_tag(0, "work").unwrap();
        list.add_tag(0, "rust").unwrap();
        list.set_priority(2, Priority::Low).unwrap();
        list.complete(1).unwrap();
        list
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        let list = sample_list();

        list.save(&path).unwrap();
        let mut loaded = TodoList::new();
        loaded.load(&path).unwrap();

        assert_eq!(loaded, list);
        assert_eq!(loaded.items()[2].text, "Ship it");
        assert!(loaded.items()[2].done);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("todos.json");

        let err = sample_list().save(&path).unwrap_err();
        assert!(matches!(err, TodoError::Io { .. }));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut list = TodoList::new();
        let err = list.load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TodoError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_leaves_list_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(&path, r#"{"items":[{"text":"half"#).unwrap();

        let mut list = sample_list();
        let before = list.clone();
        let err = list.load(&path).unwrap_err();

        assert!(matches!(err, TodoError::Decode { .. }));
        assert_eq!(list, before);
    }

    #[test]
    fn test_load_wrong_shape_leaves_list_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");

        for content in ["{}", "[]", r#"{"items": 5}"#, r#"{"tasks": []}"#] {
            fs::write(&path, content).unwrap();

            let mut list = sample_list();
            let before = list.clone();
            let err = list.load(&path).unwrap_err();

            assert!(matches!(err, TodoError::Decode { .. }), "{content}");
            assert_eq!(list, before, "{content}");
        }
    }

    #[test]
    fn test_repository_does_not_hide_wrong_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(&path, "{}").unwrap();

        let err = FileListRepository::new(&path).load().unwrap_err();
        assert!(matches!(err, TodoError::Decode { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_load_capitalised_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(
            &path,
            r#"{"Items":[
                {"Text":"Buy milk","Done":false,"Priority":1,
                 "CreatedAt":"2025-01-01T10:00:00Z"},
                {"Text":"File taxes","Done":true,"Priority":2,
                 "DueDate":"2025-04-15T00:00:00+02:00","Tags":["home"],
                 "CreatedAt":"2025-01-02T10:00:00.123456789+02:00"}
            ]}"#,
        )
        .unwrap();

        let list = TodoList::from_file(&path).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].text, "Buy milk");
        assert_eq!(list.items()[0].priority, Priority::Medium);
        assert!(!list.items()[0].done);
        assert!(list.items()[1].done);
        assert_eq!(list.items()[1].priority, Priority::High);
        assert_eq!(list.items()[1].due_date, NaiveDate::from_ymd_opt(2025, 4, 15));
        assert_eq!(list.items()[1].tags, vec!["home".to_string()]);
    }

    #[test]
    fn test_load_null_items_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(&path, r#"{"Items":null}"#).unwrap();

        assert!(TodoList::from_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_tolerates_missing_optional_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(
            &path,
            r#"{"items":[
                {"text":"a","priority":"LOW","created_at":"2025-01-01T10:00:00Z"},
                {"text":"b","done":true,"priority":2,"created_at":"2025-01-02T10:00:00Z"}
            ]}"#,
        )
        .unwrap();

        let list = TodoList::from_file(&path).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.items()[0].tags.is_empty());
        assert!(list.items()[0].due_date.is_none());
        assert_eq!(list.items()[1].priority, Priority::High);
        assert!(list.items()[1].done);
    }

    #[test]
    fn test_repository_missing_file_is_empty_list() {
        let dir = TempDir::new().unwrap();
        let repo = FileListRepository::new(dir.path().join("todos.json"));

        let list = repo.load().unwrap();
        assert!(list.is_empty());

        repo.save(&sample_list()).unwrap();
        assert_eq!(repo.load().unwrap().len(), 3);
    }
}
