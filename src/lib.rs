//! tasktrack - local task tracker library
//!
//! Tasks are kept in a single JSON file. Each operation loads the file,
//! repairs whatever it finds into a consistent task set, applies one
//! change, and writes the result back atomically.
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tasktrack.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output for commands
//! - `repair`: Normalization of raw records read from disk
//! - `repository`: Task operations (add, update, delete, status, list)
//! - `storage`: Backing file access and atomic writes
//! - `task`: Task and status types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod repair;
pub mod repository;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
pub use repository::{TaskRepository, TaskSet};
pub use task::{Status, Task, TaskId};
