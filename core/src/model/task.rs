use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the id prefix shown in lists and accepted as a shorthand.
pub const SHORT_ID_LEN: usize = 8;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub priority: bool,
}

impl Task {
    /// Builds an active, unstarred task. Callers validate `text` first.
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            priority: false,
        }
    }

    pub fn short_id(&self) -> String {
        let mut id = self.id.simple().to_string();
        id.truncate(SHORT_ID_LEN);
        id
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Which tasks a listing should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub active: usize,
    pub completed: usize,
    pub prioritized: usize,
}

impl TaskCounts {
    pub fn total(&self) -> usize {
        self.active + self.completed
    }
}
