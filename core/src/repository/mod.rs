pub mod file;
pub mod traits;

// Re-export
pub use file::{default_data_dir, FileTaskRepository};
pub use traits::{LoadReport, TaskRepository};
