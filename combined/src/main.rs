//! `caresync` - operate the care coordination core from the command line.
//!
//! Each invocation is one context over the file-backed store. Results are
//! printed to stdout as `{"success": ..., "data": ..., "error": ...}`; logs
//! go to stderr.

mod commands;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::CareConfig;
use domain::{Gender, TaskFilter, TaskPriority, TaskStatus, TaskType, UserRole};

#[derive(Parser)]
#[command(name = "caresync")]
#[command(about = "Shared care task coordination for families and caregivers")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Storage directory (overrides CARESYNC_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wipe local data back to the demo seed
    Reset,
    /// Sign in by email or the part before '@'
    Login { identifier: String, password: String },
    /// Create an account and sign in
    Signup {
        name: String,
        email: String,
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Care tasks
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Care recipients
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Household members and staff
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Show or toggle the color theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// List tasks ordered by schedule
    List {
        /// all, pending or completed
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
        /// Case-insensitive title search
        #[arg(long, default_value = "")]
        search: String,
        /// Only tasks on this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<NaiveDate>,
        /// Group the result by day
        #[arg(long)]
        by_day: bool,
    },
    /// Schedule a new task
    Create(CreateTaskArgs),
    /// Assign to a user, or toggle your own assignment when no user is given
    Assign {
        task_id: String,
        user_id: Option<String>,
        /// Clear the assignee
        #[arg(long, conflicts_with = "user_id")]
        clear: bool,
    },
    /// Set the status, or toggle completion when no status is given
    Status {
        task_id: String,
        status: Option<TaskStatus>,
    },
    /// Delete a task
    Delete { task_id: String },
}

#[derive(Args)]
struct CreateTaskArgs {
    #[arg(long)]
    title: String,
    /// Care recipient id
    #[arg(long)]
    elderly: String,
    /// RFC 3339 time, e.g. 2026-03-10T09:00:00Z
    #[arg(long)]
    at: DateTime<Utc>,
    #[arg(long, default_value = "MEDIUM")]
    priority: TaskPriority,
    #[arg(long = "type", default_value = "ACTIVITY")]
    task_type: TaskType,
    #[arg(long)]
    description: Option<String>,
    /// Assign on creation
    #[arg(long)]
    assign: Option<String>,
}

#[derive(Subcommand)]
enum ProfileAction {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        gender: GenderArg,
        /// Comma-separated list
        #[arg(long, default_value = "")]
        conditions: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Delete a profile and all of its tasks (admin)
    Delete { profile_id: String },
}

#[derive(Subcommand)]
enum UserAction {
    List,
    /// Change a user's role (admin)
    Role {
        user_id: String,
        #[arg(value_enum)]
        role: RoleArg,
    },
    /// Delete a user, unassigning their tasks (admin)
    Delete { user_id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    Member,
}

impl From<RoleArg> for UserRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::Member => UserRole::Member,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for results
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new(default_filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = CareConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.store.data_dir = dir;
    }

    let success = commands::run(cli.command, &config).await;
    if !success {
        std::process::exit(1);
    }
}

impl Command {
    /// Commands that work without a session
    fn is_public(&self) -> bool {
        matches!(
            self,
            Command::Reset
                | Command::Login { .. }
                | Command::Signup { .. }
                | Command::Logout
                | Command::Whoami
                | Command::Theme { .. }
        )
    }
}
