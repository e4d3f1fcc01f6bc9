use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::model::task::Task;
use crate::repository::traits::{LoadReport, TaskRepository};

const DEFAULT_FILE_NAME: &str = "tasks.json";
const DEFAULT_DIR_NAME: &str = ".minitodo";

/// `~/.minitodo`, the data directory used when none is given.
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

/// On-disk record. Also accepts the older `description`/`prioritized` layout,
/// which carried no id.
#[derive(Deserialize)]
struct StoredTask {
    #[serde(default)]
    id: Option<Value>,
    #[serde(alias = "description")]
    text: String,
    completed: bool,
    #[serde(default, alias = "prioritized")]
    priority: bool,
}

#[derive(Clone, Debug)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    /// Points the repository at `<data_dir>/tasks.json`. Nothing is touched on
    /// disk until the first load or save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let mut path = data_dir.into();
        path.push(DEFAULT_FILE_NAME);
        FileTaskRepository { file_path: path }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn data_dir(&self) -> &Path {
        self.file_path.parent().unwrap_or(Path::new("."))
    }

    fn ensure_data_dir(&self) -> Result<()> {
        let dir = self.data_dir();
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create data directory {}", dir.display()))
    }

    fn read_tasks(&self) -> Result<LoadReport> {
        let raw = fs::read_to_string(&self.file_path)
            .with_context(|| format!("could not read {}", self.file_path.display()))?;
        if raw.trim().is_empty() {
            return Ok(LoadReport::default());
        }

        let data: Value = serde_json::from_str(&raw)
            .with_context(|| format!("could not parse {}", self.file_path.display()))?;
        let Value::Array(records) = data else {
            bail!("invalid format in {}: expected a list", self.file_path.display());
        };

        let mut report = LoadReport::default();
        let mut seen = HashSet::new();
        for (index, record) in records.into_iter().enumerate() {
            let stored: StoredTask = match serde_json::from_value(record) {
                Ok(stored) => stored,
                Err(e) => {
                    report.warnings.push(format!("skipping invalid task record #{index}: {e}"));
                    continue;
                }
            };

            let text = stored.text.trim();
            if text.is_empty() {
                report.warnings.push(format!("skipping task record #{index}: empty text"));
                continue;
            }

            let id = match parse_id(stored.id.as_ref()) {
                Some(id) if seen.insert(id) => id,
                Some(id) => {
                    report.warnings.push(format!("task record #{index}: duplicate id {id}, assigned a new one"));
                    fresh_id(&mut seen)
                }
                None => fresh_id(&mut seen),
            };

            report.tasks.push(Task {
                id,
                text: text.to_string(),
                completed: stored.completed,
                priority: stored.priority,
            });
        }

        Ok(report)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        let mut content = serde_json::to_vec_pretty(tasks)?;
        content.push(b'\n');

        self.ensure_data_dir()?;
        let dir = self.data_dir();
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("could not create temp file in {}", dir.display()))?;
        tmp.write_all(&content)?;
        tmp.flush()?;
        tmp.persist(&self.file_path)
            .map_err(|e| e.error)
            .with_context(|| format!("could not write {}", self.file_path.display()))?;
        Ok(())
    }
}

fn parse_id(raw: Option<&Value>) -> Option<Uuid> {
    match raw? {
        Value::String(s) => Uuid::parse_str(s).ok(),
        _ => None,
    }
}

fn fresh_id(seen: &mut HashSet<Uuid>) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if seen.insert(id) {
            return id;
        }
    }
}

impl TaskRepository for FileTaskRepository {
    fn load(&self) -> Result<LoadReport> {
        if !self.file_path.is_file() {
            // Fail early when the directory can never hold the file.
            self.ensure_data_dir()?;
            return Ok(LoadReport::default());
        }
        self.read_tasks()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        self.write_tasks(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_in(dir: &TempDir) -> FileTaskRepository {
        FileTaskRepository::new(dir.path())
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let report = repo.load().unwrap();
        assert!(report.tasks.is_empty());
        assert!(report.warnings.is_empty());
        assert!(!repo.file_path().exists());
    }

    #[test]
    fn test_save_creates_nested_data_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let repo = FileTaskRepository::new(&nested);
        assert!(!nested.exists());
        assert_eq!(repo.file_path(), nested.join("tasks.json"));

        repo.save(&[Task::new("x".to_string())]).unwrap();
        assert!(nested.is_dir());
        assert_eq!(repo.load().unwrap().tasks.len(), 1);
    }

    #[test]
    fn test_data_dir_under_regular_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let repo = FileTaskRepository::new(blocker.join("data"));

        let err = repo.load().unwrap_err();
        assert!(format!("{err:#}").contains("could not create data directory"));
        assert!(repo.save(&[Task::new("x".to_string())]).is_err());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let mut done = Task::new("Done thing".to_string());
        done.completed = true;
        let mut starred = Task::new("Starred".to_string());
        starred.priority = true;
        let tasks = vec![Task::new("Plain".to_string()), done, starred];

        repo.save(&tasks).unwrap();
        let report = repo.load().unwrap();
        assert_eq!(report.tasks, tasks);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_save_overwrites_whole_file() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        repo.save(&[Task::new("one".to_string()), Task::new("two".to_string())]).unwrap();
        let only = Task::new("three".to_string());
        repo.save(std::slice::from_ref(&only)).unwrap();

        let report = repo.load().unwrap();
        assert_eq!(report.tasks, vec![only]);
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(repo.file_path(), "  \n").unwrap();
        assert!(repo.load().unwrap().tasks.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(repo.file_path(), "{not json").unwrap();
        assert!(repo.load().is_err());
    }

    #[test]
    fn test_non_list_is_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(repo.file_path(), r#"{"text": "x"}"#).unwrap();
        let err = repo.load().unwrap_err();
        assert!(err.to_string().contains("expected a list"));
    }

    #[test]
    fn test_legacy_records_are_accepted() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(
            repo.file_path(),
            r#"[
                {"description": "Old task", "completed": false, "prioritized": true},
                {"description": "Older task", "completed": true}
            ]"#,
        )
        .unwrap();

        let report = repo.load().unwrap();
        assert_eq!(report.tasks.len(), 2);
        assert_eq!(report.tasks[0].text, "Old task");
        assert!(report.tasks[0].priority);
        assert_eq!(report.tasks[1].text, "Older task");
        assert!(report.tasks[1].completed);
        assert!(!report.tasks[1].priority);
        assert_ne!(report.tasks[0].id, report.tasks[1].id);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_invalid_records_are_skipped_with_warning() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(
            repo.file_path(),
            r#"[
                {"text": "Good", "completed": false},
                {"text": "No completed flag"},
                42,
                {"text": "   ", "completed": false}
            ]"#,
        )
        .unwrap();

        let report = repo.load().unwrap();
        assert_eq!(report.tasks.len(), 1);
        assert_eq!(report.tasks[0].text, "Good");
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_duplicate_and_foreign_ids_are_replaced() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let id = Uuid::new_v4();
        fs::write(
            repo.file_path(),
            format!(
                r#"[
                    {{"id": "{id}", "text": "A", "completed": false}},
                    {{"id": "{id}", "text": "B", "completed": false}},
                    {{"id": 7, "text": "C", "completed": false}}
                ]"#
            ),
        )
        .unwrap();

        let report = repo.load().unwrap();
        assert_eq!(report.tasks.len(), 3);
        assert_eq!(report.tasks[0].id, id);
        assert_ne!(report.tasks[1].id, id);
        let ids: HashSet<_> = report.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(report.warnings.len(), 1);
    }
}
