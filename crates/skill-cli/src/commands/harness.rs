//! Harness command implementations

use colored::Colorize;
use skill_core::SyncEngine;
use skill_harness::{BindingState, Harness, HarnessReport, Layout, LinkMode};

use crate::error::{CliError, Result};

/// Run `harness sync`
///
/// With no harness given, syncs every registered harness.
pub fn run_harness_sync(
    engine: &SyncEngine,
    harness: Option<Harness>,
    mode: Option<LinkMode>,
    force: bool,
    json: bool,
) -> Result<()> {
    let reports = match harness {
        Some(harness) => vec![engine.sync_harness(harness, mode, force)?],
        None => {
            if mode.is_some() {
                return Err(CliError::user(
                    "--mode needs a harness; registered harnesses sync in their recorded mode",
                ));
            }
            let reports = engine.sync_registered_harnesses(force)?;
            if reports.is_empty() && !json {
                println!(
                    "{} No harnesses registered (use {} to add one)",
                    "=>".blue().bold(),
                    "skills harness sync <harness>".cyan()
                );
            }
            reports
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for report in &reports {
        print_sync_report(report, force);
    }
    Ok(())
}

/// Run `harness status`
pub fn run_harness_status(
    engine: &SyncEngine,
    harness: Option<Harness>,
    mode: Option<LinkMode>,
    json: bool,
) -> Result<()> {
    let harnesses = match harness {
        Some(harness) => vec![harness],
        None => engine.registered_harnesses()?,
    };

    let mut reports = Vec::new();
    for harness in harnesses {
        reports.push(engine.harness_status(harness, mode)?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    if reports.is_empty() {
        println!("  {}", "No harnesses registered".dimmed());
    }
    for report in &reports {
        println!(
            "{} ({})",
            report.harness.to_string().bold(),
            report.mode.to_string().dimmed()
        );
        for entry in &report.entries {
            println!("  {} {}", state_marker(entry.state), entry.skill);
        }
        if report.entries.is_empty() {
            println!("  {}", "No skills".dimmed());
        }
    }
    Ok(())
}

/// Run `harness import`
pub fn run_harness_import(
    engine: &SyncEngine,
    harness: Harness,
    mode: Option<LinkMode>,
) -> Result<()> {
    let report = engine.import_harness(harness, mode)?;

    if report.imported.is_empty() {
        println!(
            "{} Nothing to import from {}",
            "=>".blue().bold(),
            harness.to_string().cyan()
        );
    }
    for id in &report.imported {
        println!("{} Imported {}", "OK".green().bold(), id.cyan());
    }
    for name in &report.skipped {
        println!("   {} skipped {}", "-".yellow(), name);
    }
    if report.relinked > 0 {
        println!("   {} relinked {} entries", "+".green(), report.relinked);
    }
    if report.fallback_to_copy {
        println!(
            "{} Symlinks are unavailable here; harness entries were left as copies",
            "WARN".yellow().bold()
        );
    }
    Ok(())
}

/// Run `harness unlink`
pub fn run_harness_unlink(engine: &SyncEngine, harness: Harness, id: &str) -> Result<()> {
    if engine.unlink_harness(harness, id)? {
        println!(
            "{} Removed {} from {}",
            "OK".green().bold(),
            id.cyan(),
            harness
        );
    } else {
        println!("{} {} has no {} entry", "=>".blue().bold(), harness, id.cyan());
    }
    Ok(())
}

/// Run `harness remove`
pub fn run_harness_remove(engine: &SyncEngine, harness: Harness) -> Result<()> {
    let removed = engine.remove_harness(harness)?;
    let base = harness.base_path(engine.project().project_dir());
    if removed {
        println!("{} Removed {}", "OK".green().bold(), base.display());
    } else {
        println!("{} {} does not exist", "=>".blue().bold(), base.display());
    }
    Ok(())
}

/// Run `harness list`
pub fn run_harness_list(engine: &SyncEngine) -> Result<()> {
    let lock = engine.project_lock()?;

    println!("{}", "Harnesses".bold());
    println!();
    for harness in Harness::ALL {
        let layout = match harness.layout() {
            Layout::Directory => "<id>/SKILL.md".to_string(),
            Layout::Flat { extension } => format!("<id>.{extension}"),
        };
        let registered = match lock.harness_mode(harness) {
            Some(mode) => format!("registered, {mode}").green(),
            None if lock.harnesses().contains(&harness) => "registered".green(),
            None => "-".dimmed(),
        };
        println!(
            "  {:<12} {:<18} {:<15} {}",
            harness.id().cyan(),
            harness.base_dir(),
            layout,
            registered
        );
    }
    Ok(())
}

fn print_sync_report(report: &HarnessReport, force: bool) {
    println!(
        "{} {}: {} skills, {} written ({})",
        "OK".green().bold(),
        report.harness.to_string().cyan(),
        report.total,
        report.written(),
        report.mode
    );
    if report.fallback_to_copy {
        println!(
            "{} Symlinks are unavailable here; fell back to copy mode",
            "WARN".yellow().bold()
        );
    }
    for skill in report.conflicting() {
        println!(
            "   {} {} is a regular file or directory in the harness, left untouched",
            "!".red(),
            skill.cyan()
        );
    }
    if !force {
        let skipped: Vec<_> = report
            .entries
            .iter()
            .filter(|e| e.state == BindingState::Drifted && !e.written)
            .map(|e| e.skill.as_str())
            .collect();
        if !skipped.is_empty() {
            println!(
                "   {} drifted copies kept: {} (use {} to overwrite)",
                "-".yellow(),
                skipped.join(", "),
                "--force".cyan()
            );
        }
    }
}

fn state_marker(state: BindingState) -> colored::ColoredString {
    match state {
        BindingState::Synced => "+".green(),
        BindingState::Drifted => "~".yellow(),
        BindingState::Missing => "-".yellow(),
        BindingState::Conflict => "!".red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_core::Roots;
    use skill_test_utils::TestRoots;

    fn setup() -> (TestRoots, SyncEngine) {
        let roots = TestRoots::new();
        roots.write_project_skill("alpha", &[("SKILL.md", "# alpha\n")]);
        let engine = SyncEngine::new(Roots::new(roots.library_dir(), roots.project_dir()));
        (roots, engine)
    }

    #[test]
    fn test_sync_copy_then_remove() {
        let (roots, engine) = setup();

        run_harness_sync(&engine, Some(Harness::Cursor), Some(LinkMode::Copy), false, false)
            .unwrap();
        roots.assert_exists("project/.cursor/rules/alpha.md");

        run_harness_remove(&engine, Harness::Cursor).unwrap();
        roots.assert_not_exists("project/.cursor/rules");
    }

    #[test]
    fn test_sync_all_rejects_mode() {
        let (_roots, engine) = setup();
        let result = run_harness_sync(&engine, None, Some(LinkMode::Copy), false, false);
        assert!(matches!(result, Err(CliError::User { .. })));
    }

    #[test]
    fn test_list_and_status_without_registration() {
        let (_roots, engine) = setup();
        assert!(run_harness_list(&engine).is_ok());
        assert!(run_harness_status(&engine, None, None, false).is_ok());
    }
}
