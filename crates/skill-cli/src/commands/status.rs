//! Status command implementation

use colored::{ColoredString, Colorize};
use skill_core::{SkillStatus, SyncEngine, SyncStatus};

use crate::error::Result;

/// Run the status command
///
/// With an id, reports that skill; otherwise every skill known to either
/// root.
pub fn run_status(engine: &SyncEngine, id: Option<&str>, json: bool) -> Result<()> {
    match id {
        Some(id) => {
            let status = engine.status(id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_header(engine);
                print_row(&status);
            }
        }
        None => {
            let statuses = engine.status_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                print_header(engine);
                if statuses.is_empty() {
                    println!("  {}", "No skills".dimmed());
                }
                for status in &statuses {
                    print_row(status);
                }
            }
        }
    }
    Ok(())
}

fn print_header(engine: &SyncEngine) {
    println!("{}", "Skill Status".bold());
    println!();
    println!("{}: {}", "Library".dimmed(), engine.library().root().display());
    println!("{}: {}", "Project".dimmed(), engine.project().root().display());
    println!();
}

fn print_row(status: &SkillStatus) {
    let project = status
        .project_entry
        .as_ref()
        .map(|e| format!("v{}", e.version))
        .unwrap_or_else(|| "-".into());
    let library = status
        .library_entry
        .as_ref()
        .map(|e| format!("v{}", e.version))
        .unwrap_or_else(|| "-".into());

    println!(
        "  {:<24} {:<14} project {:<5} library {}",
        status.id.cyan(),
        label(status.status),
        project,
        library
    );
}

fn label(status: SyncStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        SyncStatus::Synced => text.green(),
        SyncStatus::Ahead | SyncStatus::Behind => text.yellow(),
        SyncStatus::Diverged => text.red().bold(),
        SyncStatus::LocalOnly | SyncStatus::LibraryOnly => text.dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_core::Roots;
    use skill_test_utils::TestRoots;

    #[test]
    fn test_status_empty_roots() {
        let roots = TestRoots::new();
        let engine = SyncEngine::new(Roots::new(roots.library_dir(), roots.project_dir()));
        assert!(run_status(&engine, None, false).is_ok());
        assert!(run_status(&engine, None, true).is_ok());
    }

    #[test]
    fn test_status_invalid_id() {
        let roots = TestRoots::new();
        let engine = SyncEngine::new(Roots::new(roots.library_dir(), roots.project_dir()));
        assert!(run_status(&engine, Some("Bad Id"), false).is_err());
    }
}
