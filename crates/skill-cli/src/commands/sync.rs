//! Install, pull, push, resolve and uninstall command implementations
//!
//! Each command is a thin wrapper over one `SyncEngine` operation that
//! prints the outcome.

use colored::Colorize;
use skill_core::{ResolveStrategy, SyncAction, SyncEngine, SyncOutcome};

use crate::error::Result;

/// Run the install command
pub fn run_install(engine: &SyncEngine, id: &str, force: bool) -> Result<()> {
    let outcome = engine.install(id, force)?;
    print_outcome(&outcome);
    Ok(())
}

/// Run the pull command
pub fn run_pull(engine: &SyncEngine, id: &str) -> Result<()> {
    let outcome = engine.pull(id)?;
    print_outcome(&outcome);
    Ok(())
}

/// Run the push command
pub fn run_push(engine: &SyncEngine, id: &str) -> Result<()> {
    let outcome = engine.push(id)?;
    print_outcome(&outcome);
    Ok(())
}

/// Run the resolve command
pub fn run_resolve(engine: &SyncEngine, id: &str, strategy: ResolveStrategy) -> Result<()> {
    println!(
        "{} Resolving {} with the {} version...",
        "=>".blue().bold(),
        id.cyan(),
        strategy
    );
    let outcome = engine.resolve(id, strategy)?;
    print_outcome(&outcome);
    Ok(())
}

/// Run the uninstall command
pub fn run_uninstall(engine: &SyncEngine, id: &str) -> Result<()> {
    let outcome = engine.uninstall(id)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &SyncOutcome) {
    let version = outcome
        .entry
        .as_ref()
        .map(|e| format!(" (v{})", e.version))
        .unwrap_or_default();

    match outcome.action {
        SyncAction::Unchanged => println!(
            "{} {} is already synced{}",
            "OK".green().bold(),
            outcome.id.cyan(),
            version.dimmed()
        ),
        SyncAction::Uninstalled => println!(
            "{} Uninstalled {} from the project",
            "OK".green().bold(),
            outcome.id.cyan()
        ),
        action => println!(
            "{} {} {}{}",
            "OK".green().bold(),
            capitalize(action.as_str()),
            outcome.id.cyan(),
            version.dimmed()
        ),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
