//! `bitgugs` -- git-backed flat-file issue tracker.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers. With `--commit`, mutating commands run
//! inside a working-tree guard and their changes are committed.

mod cli;
mod commands;
mod context;
mod editor;
mod interrupt;
mod output;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use bitgugs_git::{Restore, WorkingTreeGuard};
use bitgugs_ui::styles::render_warn;

use cli::{Cli, Commands};
use commands::Change;
use context::RuntimeContext;

/// Log filter with `-v`.
const VERBOSE_FILTER: &str =
    "warn,bitgugs=debug,bitgugs_core=debug,bitgugs_query=debug,bitgugs_git=debug,bitgugs_config=debug";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    interrupt::install();

    let json = cli.global.json;
    if let Err(e) = run(cli) {
        if json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`, which wins over the
/// default of warnings only.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { VERBOSE_FILTER } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help().ok();
        println!();
        return Ok(());
    };

    match &command {
        Commands::Completion(args) => return commands::completion::run(args),
        Commands::Commit(_) if cli.global.commit => {
            bail!("--commit cannot be combined with the commit command, which always commits")
        }
        _ => {}
    }

    let ctx = RuntimeContext::from_global_args(&cli.global)?;
    if !command.is_mutating() && ctx.commit {
        tracing::debug!("--commit ignored for read-only command");
    }
    dispatch(&ctx, &command)
}

/// Routes a parsed command to its handler.
fn dispatch(ctx: &RuntimeContext, command: &Commands) -> Result<()> {
    match command {
        Commands::New(args) => {
            let id = commands::new::pick_id(ctx, args)?;
            mutate(ctx, |ctx| commands::new::run(ctx, args, &id))
        }
        Commands::Update(args) => mutate(ctx, |ctx| commands::update::run(ctx, args)),
        Commands::Take(args) => mutate(ctx, |ctx| commands::take::run(ctx, args)),
        Commands::Commit(args) => commands::commit::run(ctx, args),
        Commands::List(args) => commands::list::run(ctx, args),
        Commands::Show(args) => commands::show::run(ctx, args),
        Commands::Config => commands::config_cmd::run(ctx),
        Commands::Completion(args) => commands::completion::run(args),
    }
}

/// Runs a mutating command, committing its change in `--commit` mode.
///
/// Local changes are stashed for the duration and put back afterwards,
/// whether the command succeeded or not. Ctrl-C is held back until then.
fn mutate(ctx: &RuntimeContext, op: impl FnOnce(&RuntimeContext) -> Result<Change>) -> Result<()> {
    if !ctx.commit {
        return op(ctx).map(drop);
    }

    let deferral = interrupt::Deferral::begin();
    let guard = WorkingTreeGuard::engage(&ctx.vcs, &ctx.config.stash_message)?;
    let result = op(ctx).and_then(|change| commands::record_change(ctx, &change));
    let restore = guard.release();
    drop(deferral);

    match &restore {
        Restore::Kept { .. } => eprintln!("{}", render_warn(&format!("warning: {restore}"))),
        _ => tracing::debug!(%restore, "working tree restored"),
    }
    if interrupt::was_interrupted() {
        eprintln!("Interrupted");
        std::process::exit(interrupt::INTERRUPTED_EXIT_CODE);
    }
    result
}
