//! Task command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::repository::TaskRepository;
use crate::task::{Status, Task, TaskId};

#[derive(Serialize)]
struct IdReport {
    id: TaskId,
}

#[derive(Serialize)]
struct StatusReport {
    id: TaskId,
    status: Status,
}

#[derive(Serialize)]
struct ListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Status>,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct InitReport {
    path: PathBuf,
    created: bool,
}

pub fn run_add(repo: &TaskRepository, description: &str, options: OutputOptions) -> Result<()> {
    let id = repo.add(description)?;
    let human = HumanOutput::new(format!("Task added successfully (ID: {id})"));
    emit_success(options, "add", &IdReport { id }, Some(&human))
}

pub fn run_update(
    repo: &TaskRepository,
    id: TaskId,
    description: &str,
    options: OutputOptions,
) -> Result<()> {
    repo.update(id, description)?;
    let human = HumanOutput::new(format!("Task {id} updated."));
    emit_success(options, "update", &IdReport { id }, Some(&human))
}

pub fn run_delete(repo: &TaskRepository, id: TaskId, options: OutputOptions) -> Result<()> {
    repo.delete(id)?;
    let human = HumanOutput::new(format!("Task {id} deleted."));
    emit_success(options, "delete", &IdReport { id }, Some(&human))
}

pub fn run_set_status(
    repo: &TaskRepository,
    id: TaskId,
    status: Status,
    options: OutputOptions,
) -> Result<()> {
    repo.set_status(id, status)?;
    let human = HumanOutput::new(format!("Task {id} marked {status}."));
    emit_success(options, "set-status", &StatusReport { id, status }, Some(&human))
}

pub fn run_list(
    repo: &TaskRepository,
    filter: Option<Status>,
    options: OutputOptions,
) -> Result<()> {
    let tasks = repo.list(filter)?;

    let mut human = HumanOutput::new("");
    if tasks.is_empty() {
        human.push_line("No tasks.");
    }
    for task in &tasks {
        human.push_line(task.to_string());
    }

    emit_success(options, "list", &ListReport { filter, tasks }, Some(&human))
}

pub fn run_init(repo: &TaskRepository, options: OutputOptions) -> Result<()> {
    let storage = repo.storage();
    let created = storage.ensure_initialized()?;

    let header = if created {
        format!("Created {}", storage.path().display())
    } else {
        format!("{} already exists", storage.path().display())
    };
    let mut human = HumanOutput::new(header);
    if !created {
        if let Err(err @ Error::CorruptStorage { .. }) = storage.read() {
            human.push_warning(format!("{err}; it will be replaced on the next change"));
        }
    }

    let report = InitReport {
        path: storage.path().to_path_buf(),
        created,
    };
    emit_success(options, "init", &report, Some(&human))
}
