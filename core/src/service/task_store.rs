use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::input::{expand_id, normalize_text};
use crate::model::task::{ListFilter, Task, TaskCounts};
use crate::repository::TaskRepository;

type CompletionHook = Box<dyn FnMut(&Task)>;

/// Owns the authoritative task list and keeps the repository in step with it.
///
/// Every successful mutation writes the whole collection before returning.
/// When that write fails the in-memory change is kept, the store is marked
/// dirty and `TaskError::Persistence` is returned; the next successful write
/// clears the flag.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    dirty: bool,
    load_warnings: Vec<String>,
    on_complete: Option<CompletionHook>,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Loads the persisted collection. Never fails: an unreadable or malformed
    /// file yields an empty store and a warning.
    pub fn open(repo: R) -> Self {
        let (tasks, load_warnings) = match repo.load() {
            Ok(report) => (report.tasks, report.warnings),
            Err(e) => (Vec::new(), vec![format!("{e:#}; starting with an empty list")]),
        };
        for warning in &load_warnings {
            warn!(target: "store", "{}", warning);
        }
        info!(target: "store", count = tasks.len(), "tasks loaded");

        Self {
            repo,
            tasks,
            dirty: false,
            load_warnings,
            on_complete: None,
        }
    }

    /// Registers a callback run whenever a task becomes completed.
    pub fn set_completion_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&Task) + 'static,
    {
        self.on_complete = Some(Box::new(hook));
    }

    pub fn add(&mut self, text: &str) -> TaskResult<Task> {
        let text = normalize_text(text)?;
        let task = Task::new(text);
        self.tasks.push(task.clone());
        info!(target: "store", id = %task.id, "task added");
        self.persist()?;
        Ok(task)
    }

    pub fn toggle_completed(&mut self, id: Uuid) -> TaskResult<Task> {
        let task = {
            let task = self.find_mut(id)?;
            task.completed = !task.completed;
            task.clone()
        };
        debug!(target: "store", id = %id, completed = task.completed, "completion toggled");
        let saved = self.persist();
        if task.completed {
            if let Some(hook) = self.on_complete.as_mut() {
                hook(&task);
            }
        }
        saved?;
        Ok(task)
    }

    pub fn toggle_priority(&mut self, id: Uuid) -> TaskResult<Task> {
        let task = {
            let task = self.find_mut(id)?;
            task.priority = !task.priority;
            task.clone()
        };
        debug!(target: "store", id = %id, priority = task.priority, "priority toggled");
        self.persist()?;
        Ok(task)
    }

    pub fn edit(&mut self, id: Uuid, new_text: &str) -> TaskResult<Task> {
        let index = self.position(id)?;
        let text = normalize_text(new_text)?;
        self.tasks[index].text = text;
        let task = self.tasks[index].clone();
        debug!(target: "store", id = %id, "task edited");
        self.persist()?;
        Ok(task)
    }

    pub fn remove(&mut self, id: Uuid) -> TaskResult<Task> {
        let index = self.position(id)?;
        let task = self.tasks.remove(index);
        info!(target: "store", id = %id, "task removed");
        self.persist()?;
        Ok(task)
    }

    /// Removes every completed task. Returns how many were removed; nothing is
    /// written when there were none.
    pub fn clear_completed(&mut self) -> TaskResult<usize> {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        let removed = before - self.tasks.len();
        if removed > 0 {
            info!(target: "store", removed, "completed tasks cleared");
            self.persist()?;
        }
        Ok(removed)
    }

    /// Retries the last failed write, if any.
    pub fn flush(&mut self) -> TaskResult<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }

    pub fn list(&self, filter: ListFilter) -> Vec<&Task> {
        order_tasks(&self.tasks, filter)
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn counts(&self) -> TaskCounts {
        self.tasks.iter().fold(TaskCounts::default(), |mut counts, task| {
            if task.completed {
                counts.completed += 1;
            } else {
                counts.active += 1;
            }
            if task.priority {
                counts.prioritized += 1;
            }
            counts
        })
    }

    /// Resolves a full id or unique id prefix to a task id.
    pub fn resolve(&self, key: &str) -> TaskResult<Uuid> {
        let ids: Vec<Uuid> = self.tasks.iter().map(|t| t.id).collect();
        expand_id(key, &ids)
    }

    /// True when the last write failed and memory is ahead of the file.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn position(&self, id: Uuid) -> TaskResult<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    fn find_mut(&mut self, id: Uuid) -> TaskResult<&mut Task> {
        let index = self.position(id)?;
        Ok(&mut self.tasks[index])
    }

    fn persist(&mut self) -> TaskResult<()> {
        match self.repo.save(&self.tasks) {
            Ok(()) => {
                self.dirty = false;
                debug!(target: "store", count = self.tasks.len(), "tasks saved");
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                warn!(target: "store", "save failed, keeping changes in memory: {e:#}");
                Err(TaskError::Persistence(e))
            }
        }
    }
}

// Standalone functions for pure logic

/// Display order: active tasks with priority first, then the other active
/// tasks, then (for `ListFilter::All`) completed tasks. Insertion order is
/// kept inside each group.
pub fn order_tasks(tasks: &[Task], filter: ListFilter) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().filter(|t| t.is_active()).collect();
    // Stable sort keeps insertion order within each group.
    ordered.sort_by_key(|t| !t.priority);
    if filter == ListFilter::All {
        ordered.extend(tasks.iter().filter(|t| t.completed));
    }
    ordered
}
