/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("invalid task: {0}")]
    Validation(String),
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("id prefix '{prefix}' is ambiguous ({matches} tasks match)")]
    AmbiguousId { prefix: String, matches: usize },
    /// The in-memory change was applied but the snapshot could not be written.
    #[error("could not save tasks: {0:#}")]
    Persistence(anyhow::Error),
}

impl TaskError {
    pub fn is_persistence(&self) -> bool {
        matches!(self, TaskError::Persistence(_))
    }
}

pub type TaskResult<T> = std::result::Result<T, TaskError>;
