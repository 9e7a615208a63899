//! Clap CLI definitions for the `bitgugs` command.

use clap::{Args, Parser, Subcommand};

/// bitgugs -- Git-based issue tracker.
///
/// Issues are plain text files under `issues/` in the repository, and git
/// history is their audit log.
#[derive(Parser, Debug)]
#[command(
    name = "bitgugs",
    about = "Git-based issue tracker",
    long_about = "Git-based issue tracker. Each issue is a flat `field: value` text file inside the repository; git history records who changed what.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Commit issue changes immediately, keeping other local changes aside.
    #[arg(short = 'c', long, global = true)]
    pub commit: bool,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create new issue.
    New(NewArgs),

    /// List issues.
    List(ListArgs),

    /// Commit code to issue.
    Commit(CommitArgs),

    /// Append a field to an issue.
    Update(UpdateArgs),

    /// Show an issue, optionally with the history of every field.
    Show(ShowArgs),

    /// Assign an issue to yourself.
    Take(TakeArgs),

    /// Show the effective configuration.
    Config,

    /// Generate shell completions.
    Completion(CompletionArgs),
}

impl Commands {
    /// Whether the command writes issue files that `--commit` should commit.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::New(_) | Self::Update(_) | Self::Take(_))
    }
}

/// Arguments for `bitgugs new`.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// A short (few words) description of the issue.
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,

    /// Identifier for new issue (default: pick next number).
    #[arg(short = 'i', long)]
    pub id: Option<String>,

    /// Initial status (default: `default-status` from config, "created").
    #[arg(short = 's', long)]
    pub status: Option<String>,
}

/// Arguments for `bitgugs list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Words to look for in title or description (default: show all issues).
    pub search: Vec<String>,

    /// List only issues of given status (default: `list-status` from config, "not closed").
    #[arg(short = 's', long, num_args = 1..)]
    pub status: Option<Vec<String>>,

    /// Show only issue titles, not contents.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Arguments for `bitgugs commit`.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Identifier for the issue you are assigning the changes to.
    pub id: String,

    /// Description of your changes.
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,

    /// Also change issue status when committing.
    #[arg(short = 's', long)]
    pub status: Option<String>,

    /// Further issues the changes belong to.
    #[arg(short = 'i', long = "ids", num_args = 1..)]
    pub ids: Vec<String>,
}

/// Arguments for `bitgugs update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Issue to update.
    pub id: String,

    /// Field name, e.g. `status` or `links`.
    pub field: String,

    /// New value.
    #[arg(required = true, num_args = 1..)]
    pub value: Vec<String>,
}

/// Arguments for `bitgugs show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Issue to show.
    pub id: String,

    /// Show who changed each field and when.
    #[arg(short = 'm', long)]
    pub meta: bool,
}

/// Arguments for `bitgugs take`.
#[derive(Args, Debug)]
pub struct TakeArgs {
    /// Issue to take.
    pub id: String,

    /// Status to set (default: `take-status` from config, "assigned").
    #[arg(short = 's', long)]
    pub status: Option<String>,
}

/// Arguments for `bitgugs completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}
