//! Tests for harness registration and mode selection on the SyncEngine

use pretty_assertions::assert_eq;
use skill_core::{Roots, Settings, SyncEngine};
use skill_harness::{Harness, LinkMode};
use skill_test_utils::TestRoots;
use std::path::Path;

fn setup() -> (TestRoots, SyncEngine) {
    let roots = TestRoots::new();
    roots.write_project_skill("alpha", &[("SKILL.md", "# alpha\n")]);
    let engine = SyncEngine::new(Roots::new(roots.library_dir(), roots.project_dir()));
    (roots, engine)
}

#[test]
fn mode_defaults_to_symlink() {
    let (_roots, engine) = setup();
    assert_eq!(
        engine.harness_mode(Harness::ClaudeCode, None).unwrap(),
        LinkMode::Symlink
    );
}

#[test]
fn settings_default_mode_applies_without_registration() {
    let (_roots, engine) = setup();
    Settings {
        default_mode: LinkMode::Copy,
        harnesses: Vec::new(),
    }
    .save(engine.library())
    .unwrap();

    assert_eq!(
        engine.harness_mode(Harness::Cursor, None).unwrap(),
        LinkMode::Copy
    );
    assert_eq!(
        engine
            .harness_mode(Harness::Cursor, Some(LinkMode::Symlink))
            .unwrap(),
        LinkMode::Symlink
    );
}

#[test]
fn sync_registers_harness_with_mode() {
    let (roots, engine) = setup();

    let report = engine
        .sync_harness(Harness::OpenCode, Some(LinkMode::Copy), false)
        .unwrap();

    assert_eq!(report.written(), 1);
    roots.assert_exists("project/.opencode/skill/alpha/SKILL.md");
    let lock = engine.project_lock().unwrap();
    assert_eq!(lock.harnesses(), &[Harness::OpenCode]);
    assert_eq!(lock.harness_mode(Harness::OpenCode), Some(LinkMode::Copy));
    // registration beats the settings default
    assert_eq!(
        engine.harness_mode(Harness::OpenCode, None).unwrap(),
        LinkMode::Copy
    );
}

#[test]
fn registration_does_not_touch_skill_entries() {
    let (_roots, engine) = setup();
    engine.push("alpha").unwrap();
    let before = engine.project_lock().unwrap().skills;

    engine
        .sync_harness(Harness::Cursor, Some(LinkMode::Copy), false)
        .unwrap();

    assert_eq!(engine.project_lock().unwrap().skills, before);
}

#[test]
fn registered_harnesses_fall_back_to_settings() {
    let (_roots, engine) = setup();
    Settings {
        default_mode: LinkMode::Copy,
        harnesses: vec![Harness::Cursor],
    }
    .save(engine.library())
    .unwrap();
    assert_eq!(engine.registered_harnesses().unwrap(), vec![Harness::Cursor]);

    engine.enable_harness(Harness::ClaudeCode, LinkMode::Copy).unwrap();
    assert_eq!(
        engine.registered_harnesses().unwrap(),
        vec![Harness::ClaudeCode]
    );
}

fn refuse_symlinks(_target: &Path, link: &Path) -> skill_fs::Result<()> {
    Err(skill_fs::Error::io(
        link,
        std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    ))
}

#[test]
fn symlink_fallback_registers_copy_mode() {
    let (roots, engine) = setup();
    let engine = engine.with_linker(refuse_symlinks);

    let report = engine
        .sync_harness(Harness::ClaudeCode, Some(LinkMode::Symlink), false)
        .unwrap();
    assert!(report.fallback_to_copy);
    assert_eq!(
        engine.project_lock().unwrap().harness_mode(Harness::ClaudeCode),
        Some(LinkMode::Copy)
    );

    // later syncs keep updating the copies instead of reporting conflicts
    roots.write_project_skill("alpha", &[("SKILL.md", "# alpha v2\n")]);
    let reports = engine.sync_registered_harnesses(true).unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].mode, LinkMode::Copy);
    assert_eq!(reports[0].conflicts, 0);
    assert_eq!(reports[0].written(), 1);
    assert_eq!(
        std::fs::read_to_string(roots.project_dir().join(".claude/skills/alpha/SKILL.md"))
            .unwrap(),
        "# alpha v2\n"
    );
}

#[test]
fn sync_registered_uses_recorded_modes() {
    let (roots, engine) = setup();
    engine.enable_harness(Harness::OpenCode, LinkMode::Copy).unwrap();
    engine.enable_harness(Harness::Cursor, LinkMode::Copy).unwrap();

    let reports = engine.sync_registered_harnesses(false).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.mode == LinkMode::Copy));
    roots.assert_exists("project/.opencode/skill/alpha/SKILL.md");
    roots.assert_exists("project/.cursor/rules/alpha.md");
}

#[test]
fn remove_harness_drops_directory_and_registration() {
    let (roots, engine) = setup();
    engine
        .sync_harness(Harness::Cursor, Some(LinkMode::Copy), false)
        .unwrap();

    assert!(engine.remove_harness(Harness::Cursor).unwrap());

    roots.assert_not_exists("project/.cursor/rules");
    let lock = engine.project_lock().unwrap();
    assert!(lock.harnesses().is_empty());
    assert_eq!(lock.harness_mode(Harness::Cursor), None);
}

#[test]
fn import_then_push_publishes_harness_content() {
    let (roots, engine) = setup();
    let harness_skill = roots.project_dir().join(".claude/skills/drafted");
    std::fs::create_dir_all(&harness_skill).unwrap();
    std::fs::write(harness_skill.join("SKILL.md"), "# drafted\n").unwrap();

    let report = engine
        .import_harness(Harness::ClaudeCode, Some(LinkMode::Copy))
        .unwrap();
    assert_eq!(report.imported, vec!["drafted".to_string()]);

    engine.push("drafted").unwrap();
    assert_eq!(roots.read_library_file("drafted", "SKILL.md"), "# drafted\n");
}

#[test]
fn unlink_validates_id() {
    let (_roots, engine) = setup();
    assert!(engine.unlink_harness(Harness::Cursor, "../x").is_err());
    assert!(!engine.unlink_harness(Harness::Cursor, "alpha").unwrap());
}
