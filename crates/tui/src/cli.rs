use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::StatusBucket;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "duet",
    version,
    about = "A terminal task list that counts down to every deadline.",
    after_help = "Examples:\n  duet                Launch the TUI (same as `duet tui`)\n  duet add \"Ship the report\" --due 2031-03-01T17:00\n  duet list --bucket expired --json\n  duet done 01J8ZQ4X\n  duet delete 01J8ZQ4X"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the tracing filter for CLI commands (e.g. "info", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui,
    /// Add a task with a deadline
    Add(AddArgs),
    /// Print tasks with their live countdowns
    List(ListArgs),
    /// Mark one or more tasks as done
    Done(DoneArgs),
    /// Delete one or more tasks by id
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task text; multiple words are joined with spaces
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,

    /// Deadline (e.g. 2031-03-01T17:00, 2031-03-01, today, tomorrow, +3d, mon)
    #[arg(long = "due", value_name = "WHEN", required = true)]
    pub due: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only show tasks in one bucket
    #[arg(long, value_enum, value_name = "BUCKET")]
    pub bucket: Option<StatusBucket>,

    /// Emit machine-readable JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DoneArgs {
    /// One or more task ids to mark done
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// One or more task ids to delete (use `x` in the TUI to delete interactively)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}
