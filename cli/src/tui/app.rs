use minitodo_core::{Config, ListFilter, StartMode, Task, TaskCounts, TaskRepository, TaskResult, TaskStore};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Full,
    Mini,
}

impl From<StartMode> for ViewMode {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Full => ViewMode::Full,
            StartMode::Mini => ViewMode::Mini,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

pub struct App<R: TaskRepository> {
    pub store: TaskStore<R>,
    /// Visible tasks in display order: active ones, then completed ones when
    /// the completed section is expanded (full mode only).
    pub rows: Vec<Task>,
    pub active_len: usize,
    pub selected: Option<usize>,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub view_mode: ViewMode,
    pub show_completed: bool,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl<R: TaskRepository> App<R> {
    pub fn new(store: TaskStore<R>, config: &Config, view_mode: ViewMode) -> App<R> {
        let warnings = store.load_warnings();
        let status = (!warnings.is_empty()).then(|| StatusMessage {
            level: StatusLevel::Warning,
            text: warnings.join("; "),
        });
        let mut app = App {
            store,
            rows: Vec::new(),
            active_len: 0,
            selected: None,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            view_mode,
            show_completed: config.show_completed,
            status,
            should_quit: false,
        };
        app.reload_tasks();
        if !app.rows.is_empty() {
            app.selected = Some(0);
        }
        app
    }

    pub fn counts(&self) -> TaskCounts {
        self.store.counts()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() { return; }

        let i = match self.selected {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() { return; }

        let i = match self.selected {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    pub fn toggle_status(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else { return };
        let result = self.store.toggle_completed(id);
        if let Some(task) = self.report(result) {
            let verb = if task.completed { "Completed" } else { "Reopened" };
            self.set_status(StatusLevel::Info, format!("{verb}: {}", task.text));
        }
        self.reload_keeping(id);
    }

    pub fn toggle_priority(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else { return };
        let result = self.store.toggle_priority(id);
        self.report(result);
        self.reload_keeping(id);
    }

    pub fn delete_task(&mut self) {
        if self.view_mode == ViewMode::Mini { return; }
        let Some(id) = self.selected_task().map(|t| t.id) else { return };
        let result = self.store.remove(id);
        if let Some(task) = self.report(result) {
            self.set_status(StatusLevel::Info, format!("Deleted: {}", task.text));
        }
        self.reload_tasks();
    }

    pub fn clear_completed(&mut self) {
        if self.view_mode == ViewMode::Mini { return; }
        let result = self.store.clear_completed();
        if let Some(removed) = self.report(result) {
            if removed > 0 {
                self.set_status(StatusLevel::Info, format!("Cleared {removed} completed"));
            }
        }
        self.reload_tasks();
    }

    pub fn toggle_completed_section(&mut self) {
        if self.view_mode == ViewMode::Mini { return; }
        let keep = self.selected_task().map(|t| t.id);
        self.show_completed = !self.show_completed;
        match keep {
            Some(id) => self.reload_keeping(id),
            None => self.reload_tasks(),
        }
    }

    pub fn switch_view_mode(&mut self) {
        let keep = self.selected_task().map(|t| t.id);
        self.view_mode = match self.view_mode {
            ViewMode::Full => ViewMode::Mini,
            ViewMode::Mini => ViewMode::Full,
        };
        self.exit_input_mode();
        match keep {
            Some(id) => self.reload_keeping(id),
            None => self.reload_tasks(),
        }
    }

    /// Attempts a last write if the store is behind and marks the app done.
    pub fn quit(&mut self) {
        let result = self.store.flush();
        self.report(result);
        self.should_quit = true;
    }

    pub fn enter_add_mode(&mut self) {
        if self.view_mode == ViewMode::Mini { return; }
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn enter_edit_mode(&mut self) {
        if self.view_mode == ViewMode::Mini { return; }
        if let Some(task) = self.selected_task() {
            let (id, text) = (task.id, task.text.clone());
            self.input_mode = InputMode::Editing(id);
            self.cursor_position = text.chars().count();
            self.input = text;
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_input(&mut self) {
        // Submitting blank input behaves like cancel.
        if self.input.trim().is_empty() {
            self.exit_input_mode();
            return;
        }

        match self.input_mode {
            InputMode::Adding => {
                let result = self.store.add(&self.input);
                match self.report(result) {
                    Some(task) => self.reload_keeping(task.id),
                    None => self.reload_tasks(),
                }
            }
            InputMode::Editing(id) => {
                let result = self.store.edit(id, &self.input);
                self.report(result);
                self.reload_keeping(id);
            }
            InputMode::Normal => {}
        }

        self.exit_input_mode();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input.chars().take(char_index).map(|c| c.len_utf8()).sum()
    }

    /// Adds a warning to the status line, after any warning already shown.
    pub fn show_warning(&mut self, text: String) {
        let text = match self.status.take() {
            Some(StatusMessage { level: StatusLevel::Warning, text: shown }) => format!("{shown}; {text}"),
            _ => text,
        };
        self.set_status(StatusLevel::Warning, text);
    }

    fn set_status(&mut self, level: StatusLevel, text: String) {
        self.status = Some(StatusMessage { level, text });
    }

    /// Turns a store result into a status line message. A failed write still
    /// applied the change in memory, so it is shown as a warning.
    fn report<T>(&mut self, result: TaskResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.status = None;
                Some(value)
            }
            Err(e) if e.is_persistence() => {
                self.set_status(StatusLevel::Warning, format!("{e} (changes kept in memory)"));
                None
            }
            Err(e) => {
                self.set_status(StatusLevel::Error, e.to_string());
                None
            }
        }
    }

    fn visible_filter(&self) -> ListFilter {
        match self.view_mode {
            ViewMode::Full if self.show_completed => ListFilter::All,
            _ => ListFilter::Active,
        }
    }

    fn reload_tasks(&mut self) {
        let previous = self.selected;
        self.rows = self.store.list(self.visible_filter()).into_iter().cloned().collect();
        self.active_len = self.rows.iter().take_while(|t| !t.completed).count();

        self.selected = if self.rows.is_empty() {
            None
        } else {
            Some(previous.unwrap_or(0).min(self.rows.len() - 1))
        };
    }

    fn reload_keeping(&mut self, id: Uuid) {
        self.reload_tasks();
        if let Some(i) = self.rows.iter().position(|t| t.id == id) {
            self.selected = Some(i);
        }
    }
}
