use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::models::{CompensationType, Priority, ProjectLifecycle, TodoStatus};

const VERSION: &str = env!("TASKBOARD_VERSION");

#[derive(Parser)]
#[command(
    name = "taskboard",
    version = VERSION,
    about = "Personal project and todo board",
    after_help = "\
NOTE:
  State lives in <dir>/.taskboard/taskboard.db. Without --dir the nearest ancestor
  of the current directory holding .taskboard/ is used.
  Run `taskboard init` before any other command.

REFERENCES:
  Projects and todos accept an exact id, an exact title (case-insensitive),
  an id prefix, or a title fragment. Several matches → AMBIGUOUS_REF.

LIFECYCLE:
  planning → inProgress → completed. Any state may be paused (onHold).
  completed/cancelled only leave via pause. Other moves → INVALID_LIFECYCLE_TRANSITION.

EXIT CODES:
  0  Success, or a confirmation was declined
  1  Error (storage, validation, corrupt state, etc.)

LOGGING:
  Set TASKBOARD_LOG (e.g. `debug`) to trace to stderr."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding .taskboard/
    #[arg(long, global = true, env = "TASKBOARD_DIR")]
    pub dir: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a board in this directory
    Init,

    /// Render the project list
    Board {
        /// Expand these projects (id or title)
        #[arg(long)]
        expand: Vec<String>,
        /// Expand every project
        #[arg(long)]
        all: bool,
    },

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Todo management
    #[command(subcommand)]
    Todo(TodoCommands),

    /// Erase every project and todo
    #[command(after_help = "\
NOTE:
  Works even when the stored state is corrupt. A fresh default project is
  created by the next command that opens the board.")]
    Reset,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a project
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = CompensationArg::Unpaid)]
        compensation: CompensationArg,
        #[arg(long, value_enum, default_value_t = LifecycleArg::Planning)]
        lifecycle: LifecycleArg,
    },
    /// List projects
    List,
    /// Show project details
    Show { reference: String },
    /// Edit project fields
    Edit {
        reference: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        lifecycle: Option<LifecycleArg>,
        #[arg(long, value_enum)]
        compensation: Option<CompensationArg>,
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        clear_deadline: bool,
    },
    /// planning|onHold → inProgress
    Start { reference: String },
    /// → completed
    Complete { reference: String },
    /// Any state → onHold
    Pause { reference: String },
    /// onHold → inProgress
    Resume { reference: String },
    /// → cancelled
    Cancel { reference: String },
    /// Attach an example URL
    Example { reference: String, url: String },
    /// Make a project the current selection
    Select { reference: String },
    /// Delete a project and all of its todos
    Delete { reference: String },
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// Add a todo (to the current project unless --project or --unassigned)
    Add {
        title: String,
        #[arg(long, conflicts_with = "unassigned")]
        project: Option<String>,
        #[arg(long)]
        unassigned: bool,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },
    /// List todos, optionally filtered
    List {
        #[arg(long)]
        project: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        #[arg(long)]
        overdue: bool,
    },
    /// Show todo details
    Show { reference: String },
    /// Edit todo fields (status changes leave the completion date alone)
    Edit {
        reference: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        #[arg(long, conflicts_with = "clear_start_date")]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        clear_start_date: bool,
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        clear_deadline: bool,
    },
    /// todo|in-progress → in-progress
    Start { reference: String },
    /// Check off: → done
    Done { reference: String },
    /// Un-check: → todo, completion date cleared
    Undo { reference: String },
    /// Delete a todo
    Delete { reference: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CompensationArg {
    Paid,
    Unpaid,
    Volunteer,
}

impl From<CompensationArg> for CompensationType {
    fn from(arg: CompensationArg) -> Self {
        match arg {
            CompensationArg::Paid => Self::Paid,
            CompensationArg::Unpaid => Self::Unpaid,
            CompensationArg::Volunteer => Self::Volunteer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LifecycleArg {
    Planning,
    #[value(name = "inProgress", alias = "in-progress")]
    InProgress,
    Completed,
    #[value(name = "onHold", alias = "on-hold")]
    OnHold,
    Cancelled,
}

impl From<LifecycleArg> for ProjectLifecycle {
    fn from(arg: LifecycleArg) -> Self {
        match arg {
            LifecycleArg::Planning => Self::Planning,
            LifecycleArg::InProgress => Self::InProgress,
            LifecycleArg::Completed => Self::Completed,
            LifecycleArg::OnHold => Self::OnHold,
            LifecycleArg::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Todo,
    InProgress,
    Done,
}

impl From<StatusArg> for TodoStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Todo => Self::Todo,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Done => Self::Done,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}
