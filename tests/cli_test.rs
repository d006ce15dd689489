use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary under a throwaway HOME so config and backups never touch the real one
fn swimcoach(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("swimcoach").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("SWIMCOACH_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("macOS terminal"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("managers"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("organize"))
        .stdout(predicate::str::contains("nav"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("swimcoach"));
}

#[test]
fn test_clean_rejects_dry_run_with_apply() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["clean", "--dry-run", "--apply"])
        .assert()
        .failure();
}

// ─── Probe & managers ────────────────────────────────────────────────────────

#[test]
fn test_probe_json_output() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["probe", "--format", "json", "--timeout", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"os_version\""))
        .stdout(predicate::str::contains("\"package_managers\""))
        .stdout(predicate::str::contains("\"disk_usage\""))
        .stdout(predicate::str::contains("\"shell\""));
}

#[test]
fn test_managers_json_lists_registry() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["managers", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"homebrew\""))
        .stdout(predicate::str::contains("\"macports\""))
        .stdout(predicate::str::contains("\"installed\""));
}

#[test]
fn test_managers_show_homebrew() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["managers", "show", "homebrew", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brew uninstall {package}"))
        .stdout(predicate::str::contains("brew cleanup"));
}

#[test]
fn test_managers_show_unknown_fails() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["managers", "show", "apt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

// ─── Clean & organize (dry run by default) ───────────────────────────────────

#[test]
fn test_clean_defaults_to_dry_run() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["clean", "--caches", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dry_run\": true"))
        .stdout(predicate::str::contains("\"bytes_freed\": 0"))
        .stdout(predicate::str::contains("\"executed_commands\": []"));
}

#[test]
fn test_clean_prompt_keeps_json_stdout_clean() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["clean", "--apply", "--format", "json"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[y/N]"))
        .stderr(predicate::str::contains("Cancelled"));
}

#[test]
fn test_organize_dry_run_leaves_home_untouched() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(".zshrc"), "# zsh\n").unwrap();

    swimcoach(&home)
        .args(["organize", "--no-shell-check", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\".zshrc\""))
        .stdout(predicate::str::contains("Use aliases for common commands"));

    assert!(!home.path().join("terminal_coach_backup").exists());
}

#[test]
fn test_organize_apply_writes_backup() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(".bashrc"), "# bash\n").unwrap();

    swimcoach(&home)
        .args(["organize", "--no-shell-check", "--apply", "--quiet", "--format", "quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".bashrc"));

    let backups: Vec<_> = std::fs::read_dir(home.path().join("terminal_coach_backup"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with(".bashrc."));
}

// ─── Nav ─────────────────────────────────────────────────────────────────────

#[test]
fn test_nav_json_output() {
    let home = TempDir::new().unwrap();
    std::fs::create_dir(home.path().join("Documents")).unwrap();

    swimcoach(&home)
        .args(["nav", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"directory_aliases\""))
        .stdout(predicate::str::contains("goto_documents"))
        .stdout(predicate::str::contains("goto_development").not());
}

#[test]
fn test_nav_export_writes_script() {
    let home = TempDir::new().unwrap();
    let script = home.path().join("nav.sh");

    swimcoach(&home)
        .args(["nav", "--quiet", "--export"])
        .arg(&script)
        .assert()
        .success();

    let content = std::fs::read_to_string(&script).unwrap();
    assert!(content.starts_with("#!/bin/bash\n"));
    assert!(content.contains("alias goto_home=\"cd ~\""));
    assert!(content.ends_with("alias lsd='ls -la | grep ^d'\n"));
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[test]
fn test_config_show() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("command_timeout_secs"))
        .stdout(predicate::str::contains("terminal_coach_backup"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["config", "set", "command_timeout_secs", "45"])
        .assert()
        .success();

    swimcoach(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("command_timeout_secs = 45"));
}

fn write_broken_config(home: &TempDir) {
    let dir = home.path().join(".swimcoach");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "command_timeout_secs = \"soon\"\n").unwrap();
}

#[test]
fn test_broken_config_fails_regular_commands() {
    let home = TempDir::new().unwrap();
    write_broken_config(&home);

    swimcoach(&home)
        .arg("nav")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_config_reset_repairs_broken_config() {
    let home = TempDir::new().unwrap();
    write_broken_config(&home);

    swimcoach(&home).args(["config", "reset"]).assert().success();

    swimcoach(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("command_timeout_secs = 30"));
}

#[test]
fn test_config_set_over_broken_config() {
    let home = TempDir::new().unwrap();
    write_broken_config(&home);

    swimcoach(&home)
        .args(["config", "set", "command_timeout_secs", "12"])
        .assert()
        .success();

    swimcoach(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("command_timeout_secs = 12"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["config", "set", "lane_count", "8"])
        .assert()
        .failure();
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    swimcoach(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("swimcoach"));
}
