use std::collections::HashSet;
use std::fs;

use minitodo_core::{FileTaskRepository, ListFilter, Task, TaskError, TaskStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use uuid::Uuid;

fn open_store(dir: &TempDir) -> TaskStore<FileTaskRepository> {
    TaskStore::open(FileTaskRepository::new(dir.path()))
}

fn texts(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.text.clone()).collect()
}

#[test]
fn fresh_environment_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    assert!(store.tasks().is_empty());
    assert!(store.load_warnings().is_empty());
}

#[test]
fn mutations_survive_reload() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    let milk = store.add("Buy milk").unwrap();
    let bread = store.add("Buy bread").unwrap();
    let call = store.add("Call mom").unwrap();
    store.toggle_priority(bread.id).unwrap();
    store.toggle_completed(milk.id).unwrap();
    store.edit(call.id, "Call mom tonight").unwrap();
    let gone = store.add("Temporary").unwrap();
    store.remove(gone.id).unwrap();

    let before = store.tasks().to_vec();
    drop(store);

    let reloaded = open_store(&dir);
    assert_eq!(reloaded.tasks(), before.as_slice());
    assert_eq!(
        texts(&reloaded.list(ListFilter::All)),
        vec!["Buy bread", "Call mom tonight", "Buy milk"]
    );
}

#[test]
fn file_always_holds_full_snapshot() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    store.add("one").unwrap();
    store.add("two").unwrap();

    let raw = fs::read_to_string(store.repository().file_path()).unwrap();
    let on_disk: Vec<Task> = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk, store.tasks().to_vec());
}

#[test]
fn starred_task_moves_above_earlier_tasks() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    store.add("A").unwrap();
    let b = store.add("B").unwrap();
    store.toggle_priority(b.id).unwrap();
    assert_eq!(texts(&store.list(ListFilter::Active)), vec!["B", "A"]);
}

#[test]
fn later_plain_task_stays_below_starred_one() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    let milk = store.add("Buy milk").unwrap();
    assert_eq!(store.tasks().len(), 1);
    assert!(!milk.completed && !milk.priority);

    store.toggle_priority(milk.id).unwrap();
    store.add("Walk dog").unwrap();
    assert_eq!(texts(&store.list(ListFilter::Active)), vec!["Buy milk", "Walk dog"]);
}

#[test]
fn active_listing_never_contains_completed() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    let ids: Vec<Uuid> = (0..6).map(|i| store.add(&format!("task {i}")).unwrap().id).collect();
    for (i, id) in ids.iter().enumerate() {
        if i % 2 == 0 {
            store.toggle_priority(*id).unwrap();
        }
        if i % 3 == 0 {
            store.toggle_completed(*id).unwrap();
        }
    }

    let active = store.list(ListFilter::Active);
    assert!(active.iter().all(|t| !t.completed));
    let first_plain = active.iter().position(|t| !t.priority).unwrap_or(active.len());
    assert!(active[first_plain..].iter().all(|t| !t.priority));
    assert_eq!(texts(&active), vec!["task 2", "task 4", "task 1", "task 5"]);

    let all = store.list(ListFilter::All);
    assert_eq!(all.len(), 6);
    assert!(all[active.len()..].iter().all(|t| t.completed));
}

#[test]
fn toggles_are_involutions() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    let task = store.add("Flip").unwrap();

    store.toggle_completed(task.id).unwrap();
    let back = store.toggle_completed(task.id).unwrap();
    assert_eq!(back.completed, task.completed);

    store.toggle_priority(task.id).unwrap();
    let back = store.toggle_priority(task.id).unwrap();
    assert_eq!(back.priority, task.priority);
}

#[test]
fn ids_are_unique_after_many_adds() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    for _ in 0..200 {
        store.add("same text").unwrap();
    }
    let ids: HashSet<Uuid> = store.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn empty_edit_is_rejected_and_text_kept() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    let task = store.add("Keep").unwrap();
    assert!(matches!(store.edit(task.id, ""), Err(TaskError::Validation(_))));
    drop(store);

    let reloaded = open_store(&dir);
    assert_eq!(reloaded.get(task.id).unwrap().text, "Keep");
}

#[test]
fn corrupt_file_starts_empty_with_warning() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.json"), "[{\"text\": ").unwrap();
    let mut store = open_store(&dir);
    assert!(store.tasks().is_empty());
    assert_eq!(store.load_warnings().len(), 1);

    // The next mutation replaces the corrupt file with a valid snapshot.
    store.add("Fresh start").unwrap();
    drop(store);
    let reloaded = open_store(&dir);
    assert_eq!(reloaded.tasks().len(), 1);
}

#[test]
fn unusable_data_dir_opens_empty_and_keeps_changes_in_memory() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "regular file").unwrap();

    let mut store = TaskStore::open(FileTaskRepository::new(blocker.join("data")));
    assert!(store.tasks().is_empty());
    assert_eq!(store.load_warnings().len(), 1);
    assert!(store.load_warnings()[0].contains("could not create data directory"));

    let err = store.add("Still here").unwrap_err();
    assert!(matches!(err, TaskError::Persistence(_)));
    assert!(store.is_dirty());
    assert_eq!(texts(&store.list(ListFilter::All)), vec!["Still here"]);
}
