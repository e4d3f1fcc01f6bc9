pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;

pub use config::{Config, StartMode};
pub use error::{TaskError, TaskResult};
pub use input::{expand_id, join_words, normalize_text};
pub use model::task::{ListFilter, Task, TaskCounts, SHORT_ID_LEN};
pub use repository::{default_data_dir, FileTaskRepository, LoadReport, TaskRepository};
pub use service::task_store::{order_tasks, TaskStore};
