//! Task repository
//!
//! Every public operation is one self-contained cycle: load the raw records,
//! run the repair pass, apply the mutation to a [`TaskSet`], and save. The
//! set is never kept between calls. Validation and lookup failures return
//! before anything is written.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::repair::repair;
use crate::storage::Storage;
use crate::task::{normalize_description, Status, Task, TaskId};

/// The in-memory task collection for a single operation, in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Id for the next added task: one past the current maximum.
    ///
    /// Gaps left by deletions are not reused. This differs from the repair
    /// pass, which fills the smallest gap for records that arrive without an
    /// id. Fails once the largest stored id is `TaskId::MAX`.
    pub fn next_id(&self) -> Result<TaskId> {
        self.tasks
            .iter()
            .map(|task| task.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| Error::InvalidArgument("task id space exhausted".to_string()))
    }

    pub fn add(&mut self, description: &str, now: DateTime<Utc>) -> Result<TaskId> {
        let description = normalize_description(description)?;
        let id = self.next_id()?;
        self.tasks.push(Task::new(id, description, now));
        Ok(id)
    }

    pub fn update(&mut self, id: TaskId, description: &str, now: DateTime<Utc>) -> Result<()> {
        let task = self.get_mut(id)?;
        let description = normalize_description(description)?;
        task.set_description(description, now);
        Ok(())
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::NotFound(id))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn set_status(&mut self, id: TaskId, status: Status, now: DateTime<Utc>) -> Result<()> {
        self.get_mut(id)?.set_status(status, now);
        Ok(())
    }

    /// Tasks matching `filter` (all when `None`), in stored order.
    pub fn filtered(&self, filter: Option<Status>) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| filter.map_or(true, |status| task.status == status))
            .cloned()
            .collect()
    }
}

/// Caller-facing task operations backed by a [`Storage`].
#[derive(Debug, Clone)]
pub struct TaskRepository {
    storage: Storage,
}

impl TaskRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Load and repair the current task set.
    pub fn load(&self) -> Result<TaskSet> {
        let records = self.storage.load()?;
        let repaired = repair(records, Utc::now());
        if !repaired.report.is_clean() {
            warn!(
                path = %self.storage.path().display(),
                dropped = repaired.report.dropped,
                statuses_reset = repaired.report.statuses_reset,
                timestamps_filled = repaired.report.timestamps_filled,
                duplicate_ids = repaired.report.duplicate_ids,
                ids_assigned = repaired.report.ids_assigned,
                "repaired task file on load"
            );
        }
        Ok(TaskSet::new(repaired.tasks))
    }

    pub fn save(&self, set: &TaskSet) -> Result<()> {
        self.storage.save(set.tasks())
    }

    /// Add a task and return its id.
    pub fn add(&self, description: &str) -> Result<TaskId> {
        let id = self.mutate(|set, now| set.add(description, now))?;
        debug!(id, "added task");
        Ok(id)
    }

    pub fn update(&self, id: TaskId, description: &str) -> Result<()> {
        self.mutate(|set, now| set.update(id, description, now))?;
        debug!(id, "updated task");
        Ok(())
    }

    pub fn delete(&self, id: TaskId) -> Result<()> {
        self.mutate(|set, _| set.delete(id))?;
        debug!(id, "deleted task");
        Ok(())
    }

    pub fn set_status(&self, id: TaskId, status: Status) -> Result<()> {
        self.mutate(|set, now| set.set_status(id, status, now))?;
        debug!(id, %status, "changed task status");
        Ok(())
    }

    /// List tasks, optionally filtered by status. Read-only: never saves.
    pub fn list(&self, filter: Option<Status>) -> Result<Vec<Task>> {
        Ok(self.load()?.filtered(filter))
    }

    /// Fetch a single task by id.
    pub fn get(&self, id: TaskId) -> Result<Task> {
        self.load()?.get(id).cloned().ok_or(Error::NotFound(id))
    }

    // Load, apply, and save only if the mutation succeeded.
    fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TaskSet, DateTime<Utc>) -> Result<T>,
    {
        let mut set = self.load()?;
        let result = f(&mut set, Utc::now())?;
        self.save(&set)?;
        Ok(result)
    }
}
