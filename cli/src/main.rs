mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use minitodo_core::{
    default_data_dir, join_words, Config, FileTaskRepository, ListFilter, Task, TaskStore,
};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use tracing::info;

use crate::tui::app::ViewMode;

/// Relative data directory used when the home directory is unknown.
const FALLBACK_DATA_DIR: &str = ".minitodo";

#[derive(Parser)]
#[command(name = "minitodo")]
#[command(about = "A small to-do list with a full and a mini terminal view", long_about = None)]
struct Cli {
    /// Directory holding tasks.json, config.toml and the log [default: ~/.minitodo]
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add Buy milk)
    Add {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// List tasks: starred first, completed last
    List {
        /// Only show tasks that are not completed
        #[arg(long)]
        active: bool,
    },
    /// Toggle a task's completed flag
    Done {
        /// Task id or unique id prefix
        id: String,
    },
    /// Toggle a task's star (priority)
    Star {
        /// Task id or unique id prefix
        id: String,
    },
    /// Replace a task's text
    Edit {
        /// Task id or unique id prefix
        id: String,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Delete a task
    Rm {
        /// Task id or unique id prefix
        id: String,
    },
    /// Delete all completed tasks
    Clear,
    /// Open the Terminal User Interface
    Tui {
        /// Start in the compact active-tasks view
        #[arg(long)]
        mini: bool,
    },
}

// Helper struct for Table Row
#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "St")]
    status: &'static str,
    #[tabled(rename = "Pr")]
    star: &'static str,
    #[tabled(rename = "Task")]
    text: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.short_id(),
            status: if task.completed { "✔" } else { "☐" },
            star: if task.priority { "★" } else { "" },
            text: task.text.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut notices = Vec::new();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir().unwrap_or_else(|e| {
            notices.push(format!("{e:#}; using ./{FALLBACK_DATA_DIR}"));
            PathBuf::from(FALLBACK_DATA_DIR)
        }),
    };
    let repo = FileTaskRepository::new(&data_dir);

    if let Err(e) = logging::init(&data_dir) {
        eprintln!("Warning: {e:#}");
    }
    info!(data_dir = %data_dir.display(), "starting");

    let (config, config_warning) = Config::load(&data_dir);
    notices.extend(config_warning);
    let mut store = TaskStore::open(repo);

    let command = cli.command.unwrap_or(Commands::Tui { mini: false });
    if !matches!(command, Commands::Tui { .. }) {
        for warning in store.load_warnings().iter().chain(notices.iter()) {
            eprintln!("Warning: {}", warning);
        }
    }

    match command {
        Commands::Add { text } => {
            let task = store.add(&join_words(&text))?;
            println!("Task added: {} (ID: {})", task.text, task.short_id());
        }
        Commands::List { active } => {
            let filter = if active { ListFilter::Active } else { ListFilter::All };
            print_tasks(&store.list(filter));
        }
        Commands::Done { id } => {
            let id = store.resolve(&id)?;
            let task = store.toggle_completed(id)?;
            let verb = if task.completed { "Completed" } else { "Reopened" };
            println!("{}: {}", verb, task.text);
        }
        Commands::Star { id } => {
            let id = store.resolve(&id)?;
            let task = store.toggle_priority(id)?;
            let verb = if task.priority { "Starred" } else { "Unstarred" };
            println!("{}: {}", verb, task.text);
        }
        Commands::Edit { id, text } => {
            let id = store.resolve(&id)?;
            let task = store.edit(id, &join_words(&text))?;
            println!("Task updated: {}", task.text);
        }
        Commands::Rm { id } => {
            let id = store.resolve(&id)?;
            let task = store.remove(id)?;
            println!("Task deleted: {}", task.text);
        }
        Commands::Clear => {
            let removed = store.clear_completed()?;
            println!("Removed {} completed task(s).", removed);
        }
        Commands::Tui { mini } => {
            let view_mode = if mini { ViewMode::Mini } else { ViewMode::from(config.start_mode) };
            tui::run(store, &config, view_mode, notices)?;
        }
    }

    Ok(())
}

fn print_tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::from(*t)).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    println!("{}", table);
}
