//! Command-line interface for tasktrack
//!
//! This module defines the CLI structure using clap derive macros. The
//! command layer only parses arguments and prints results; every rule about
//! tasks lives in [`crate::repository`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::repository::TaskRepository;
use crate::storage::Storage;
use crate::task::{Status, TaskId};

mod task;

/// tasktrack - a local task tracker
///
/// Records short text tasks in a JSON file and tracks them through
/// todo, in-progress, and done.
#[derive(Parser, Debug)]
#[command(name = "tasktrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task file (defaults to tasks.json in the current directory)
    #[arg(long, global = true, env = "TASKTRACK_FILE")]
    pub file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task description (words are joined with spaces)
        #[arg(required = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },

    /// Replace a task's description
    Update {
        /// Task id
        id: TaskId,

        /// New description (words are joined with spaces)
        #[arg(required = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: TaskId,
    },

    /// Set a task's status to in-progress
    MarkInProgress {
        /// Task id
        id: TaskId,
    },

    /// Set a task's status to done
    MarkDone {
        /// Task id
        id: TaskId,
    },

    /// Set a task's status back to todo
    MarkTodo {
        /// Task id
        id: TaskId,
    },

    /// Set a task's status
    SetStatus {
        /// Task id
        id: TaskId,

        /// New status: todo, in-progress, or done
        status: String,
    },

    /// List tasks
    List {
        /// Only show tasks with this status: todo, in-progress, or done
        status: Option<String>,
    },

    /// Create an empty task file if none exists
    Init,
}

impl Cli {
    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir()?;
        let config = Config::load_from_dir(&cwd);
        let path = config.tasks_file(&cwd, self.file.as_deref());
        let repo = TaskRepository::new(Storage::new(path));
        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        // The task file is created up front so later commands always find one.
        if !matches!(self.command, Commands::Init) {
            repo.storage().ensure_initialized()?;
        }

        match self.command {
            Commands::Add { description } => task::run_add(&repo, &description.join(" "), options),
            Commands::Update { id, description } => {
                task::run_update(&repo, id, &description.join(" "), options)
            }
            Commands::Delete { id } => task::run_delete(&repo, id, options),
            Commands::MarkInProgress { id } => {
                task::run_set_status(&repo, id, Status::InProgress, options)
            }
            Commands::MarkDone { id } => task::run_set_status(&repo, id, Status::Done, options),
            Commands::MarkTodo { id } => task::run_set_status(&repo, id, Status::Todo, options),
            Commands::SetStatus { id, status } => {
                let status: Status = status.parse()?;
                task::run_set_status(&repo, id, status, options)
            }
            Commands::List { status } => {
                let filter = status.as_deref().map(str::parse::<Status>).transpose()?;
                task::run_list(&repo, filter, options)
            }
            Commands::Init => task::run_init(&repo, options),
        }
    }
}
