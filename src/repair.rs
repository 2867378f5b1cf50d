//! Repair pass applied to raw records after every load.
//!
//! The backing file may have been edited by hand or written by an older
//! version, so records are read leniently and normalized into [`Task`]s:
//!
//! 1. Records that are not even minimally well-formed are dropped.
//! 2. Unknown statuses become `todo`; missing timestamps are backfilled.
//! 3. Records without an id get the smallest positive id not yet in use,
//!    in file order.
//!
//! Running the pass over its own output changes nothing.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::task::{Status, Task, TaskId};

/// What the repair pass had to change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Records discarded as malformed
    pub dropped: usize,
    /// Records whose status was coerced to `todo`
    pub statuses_reset: usize,
    /// Records with at least one backfilled timestamp
    pub timestamps_filled: usize,
    /// Records whose id duplicated an earlier record's id
    pub duplicate_ids: usize,
    /// Records that received a fresh id
    pub ids_assigned: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == RepairReport::default()
    }
}

#[derive(Debug)]
pub struct Repaired {
    pub tasks: Vec<Task>,
    pub report: RepairReport,
}

/// A record that survived step 1 but may still lack an id.
struct Candidate {
    id: Option<TaskId>,
    description: String,
    status: Status,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Normalize raw records into tasks. `now` backfills missing timestamps.
pub fn repair(records: Vec<Value>, now: DateTime<Utc>) -> Repaired {
    let mut report = RepairReport::default();
    let mut candidates = Vec::with_capacity(records.len());

    for record in &records {
        match candidate(record, now, &mut report) {
            Some(candidate) => candidates.push(candidate),
            None => report.dropped += 1,
        }
    }

    let mut used = HashSet::new();
    for candidate in &mut candidates {
        if let Some(id) = candidate.id {
            if !used.insert(id) {
                candidate.id = None;
                report.duplicate_ids += 1;
            }
        }
    }

    let mut next_free: TaskId = 1;
    let tasks = candidates
        .into_iter()
        .map(|candidate| {
            let id = match candidate.id {
                Some(id) => id,
                None => {
                    while used.contains(&next_free) {
                        next_free += 1;
                    }
                    used.insert(next_free);
                    report.ids_assigned += 1;
                    next_free
                }
            };
            Task {
                id,
                description: candidate.description,
                status: candidate.status,
                created_at: candidate.created_at,
                updated_at: candidate.updated_at,
            }
        })
        .collect();

    Repaired { tasks, report }
}

fn candidate(record: &Value, now: DateTime<Utc>, report: &mut RepairReport) -> Option<Candidate> {
    let fields = record.as_object()?;

    let id = match fields.get("id") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_u64().filter(|id| *id > 0)?),
    };
    let description = fields.get("description")?.as_str()?.to_string();
    let status = match fields.get("status")?.as_str().map(str::parse::<Status>) {
        Some(Ok(status)) => status,
        _ => {
            report.statuses_reset += 1;
            Status::Todo
        }
    };

    let stored_created = timestamp(fields, "createdAt");
    let stored_updated = timestamp(fields, "updatedAt");
    if stored_created.is_none() || stored_updated.is_none() {
        report.timestamps_filled += 1;
    }
    let created_at = stored_created.unwrap_or(now);
    let updated_at = stored_updated.unwrap_or(created_at).max(created_at);

    Some(Candidate {
        id,
        description,
        status,
        created_at,
        updated_at,
    })
}

// Empty, non-string, and unparsable values all count as missing.
fn timestamp(fields: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let raw = fields.get(key)?.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
