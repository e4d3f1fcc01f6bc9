use crate::model::task::Task;
use anyhow::Result;

/// Result of reading the persisted collection.
///
/// `warnings` lists records that were skipped or repaired; the load itself
/// still succeeded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub tasks: Vec<Task>,
    pub warnings: Vec<String>,
}

pub trait TaskRepository {
    fn load(&self) -> Result<LoadReport>;
    /// Replaces the persisted collection with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}
