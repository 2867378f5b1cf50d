use std::fs;
use std::thread;
use std::time::Duration;

use tasktrack::repair::repair;
use tasktrack::storage::Storage;
use tasktrack::{Error, Status, TaskRepository};
use tempfile::TempDir;

fn repo_in(temp: &TempDir) -> TaskRepository {
    TaskRepository::new(Storage::in_dir(temp.path()))
}

#[test]
fn end_to_end_lifecycle() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);

    let id = repo.add("buy milk").unwrap();
    assert_eq!(id, 1);

    let tasks = repo.list(None).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, 1);
    assert_eq!(tasks[0].description, "buy milk");
    assert_eq!(tasks[0].status, Status::Todo);
    let original_updated = tasks[0].updated_at;

    thread::sleep(Duration::from_millis(5));
    repo.set_status(1, Status::InProgress).unwrap();

    let in_progress = repo.list(Some(Status::InProgress)).unwrap();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].id, 1);
    assert!(in_progress[0].updated_at > original_updated);
    assert_eq!(in_progress[0].created_at, tasks[0].created_at);

    repo.delete(1).unwrap();
    assert!(repo.list(None).unwrap().is_empty());

    assert_eq!(repo.add("new task").unwrap(), 1);
}

#[test]
fn sequential_adds_are_unique_and_increasing() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);

    let ids: Vec<_> = (0..20)
        .map(|n| repo.add(&format!("task {n}")).unwrap())
        .collect();

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
}

#[test]
fn deleted_gap_is_not_reused_by_add() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);

    repo.add("one").unwrap();
    repo.add("two").unwrap();
    repo.add("three").unwrap();
    repo.delete(2).unwrap();

    assert_eq!(repo.add("four").unwrap(), 4);
    let ids: Vec<_> = repo.list(None).unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn blank_add_leaves_file_identical() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);
    repo.add("keep me").unwrap();
    let before = fs::read(repo.storage().path()).unwrap();

    assert!(matches!(repo.add(""), Err(Error::InvalidArgument(_))));
    assert!(matches!(repo.add("   "), Err(Error::InvalidArgument(_))));

    assert_eq!(fs::read(repo.storage().path()).unwrap(), before);
}

#[test]
fn delete_missing_id_leaves_file_identical() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);
    repo.add("a").unwrap();
    let before = fs::read(repo.storage().path()).unwrap();

    assert!(matches!(repo.delete(99), Err(Error::NotFound(99))));
    assert_eq!(fs::read(repo.storage().path()).unwrap(), before);
}

#[test]
fn status_filter_tracks_changes() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);
    let id = repo.add("ship it").unwrap();
    repo.add("other").unwrap();

    repo.set_status(id, Status::Done).unwrap();

    let done = repo.list(Some(Status::Done)).unwrap();
    assert!(done.iter().any(|t| t.id == id));
    let todo = repo.list(Some(Status::Todo)).unwrap();
    assert!(todo.iter().all(|t| t.id != id));
    assert_eq!(todo.len(), 1);
}

#[test]
fn update_replaces_description() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);
    let id = repo.add("draft").unwrap();
    let before = repo.get(id).unwrap();

    thread::sleep(Duration::from_millis(5));
    repo.update(id, "  final   version  ").unwrap();

    let after = repo.get(id).unwrap();
    assert_eq!(after.description, "final   version");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[test]
fn save_then_load_round_trips_tasks() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);
    repo.add("first").unwrap();
    repo.add("second ünïcode").unwrap();
    repo.set_status(2, Status::InProgress).unwrap();

    let set = repo.load().unwrap();
    let storage = repo.storage();
    storage.save(set.tasks()).unwrap();

    let reloaded = repair(storage.load().unwrap(), chrono::Utc::now());
    assert!(reloaded.report.is_clean());
    assert_eq!(reloaded.tasks, set.tasks());
}

#[test]
fn hand_edited_file_is_repaired() {
    let temp = TempDir::new().expect("tempdir");
    let repo = repo_in(&temp);
    fs::write(
        repo.storage().path(),
        r#"[
            {"id": 2, "description": "kept", "status": "done",
             "createdAt": "2024-01-01T00:00:00.000001Z", "updatedAt": "2024-01-02T00:00:00Z"},
            {"id": null, "description": "needs id", "status": "assigned"},
            {"description": "missing status"},
            42
        ]"#,
    )
    .unwrap();

    let tasks = repo.list(None).unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, 2);
    assert_eq!(tasks[0].status, Status::Done);
    assert_eq!(tasks[1].id, 1);
    assert_eq!(tasks[1].status, Status::Todo);
    assert!(tasks[1].updated_at >= tasks[1].created_at);

    assert_eq!(repo.add("next").unwrap(), 3);
}
