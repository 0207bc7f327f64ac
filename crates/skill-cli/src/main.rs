//! Skill library CLI
//!
//! Moves skills between the user-wide library and a project, and projects
//! them into harness directories.
//!
//! Exit codes: 0 on success, 2 when a conflict needs an explicit
//! `resolve`, 1 for every other failure.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, HarnessAction};
use context::Context;
use error::Result;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // clap uses 2 for usage errors, which is reserved for conflicts here
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        if let Err(e) = logging::init() {
            eprintln!("{}: failed to initialise logging: {}", "warning".yellow().bold(), e);
        }
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} skill library CLI", "skills".green().bold());
        println!();
        println!("Run {} for available commands.", "skills --help".cyan());
        return Ok(());
    };

    let context = Context::resolve(cli.library, cli.project)?;
    execute_command(&context, command)
}

fn execute_command(context: &Context, command: Commands) -> Result<()> {
    let engine = context.engine();
    match command {
        Commands::Install { id, force } => commands::run_install(&engine, &id, force),
        Commands::Pull { id } => commands::run_pull(&engine, &id),
        Commands::Push { id } => commands::run_push(&engine, &id),
        Commands::Resolve { id, strategy } => {
            commands::run_resolve(&engine, &id, strategy.into())
        }
        Commands::Uninstall { id } => commands::run_uninstall(&engine, &id),
        Commands::Status { id, json } => commands::run_status(&engine, id.as_deref(), json),
        Commands::Harness { action } => execute_harness(&engine, action),
    }
}

fn execute_harness(engine: &skill_core::SyncEngine, action: HarnessAction) -> Result<()> {
    match action {
        HarnessAction::Sync {
            harness,
            mode,
            force,
            json,
        } => commands::run_harness_sync(engine, harness, mode, force, json),
        HarnessAction::Import { harness, mode } => {
            commands::run_harness_import(engine, harness, mode)
        }
        HarnessAction::Status {
            harness,
            mode,
            json,
        } => commands::run_harness_status(engine, harness, mode, json),
        HarnessAction::Unlink { harness, id } => {
            commands::run_harness_unlink(engine, harness, &id)
        }
        HarnessAction::Remove { harness } => commands::run_harness_remove(engine, harness),
        HarnessAction::List => commands::run_harness_list(engine),
    }
}
