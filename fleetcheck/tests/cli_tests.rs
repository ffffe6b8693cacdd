use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const RULES: &str = r#"
validation_rules:
  defaults:
    sessions_min: 1000
    processes_min: 300
  overrides:
    FREE:
      sessions_min: 100
"#;

/// Scratch directory holding the documents of one test.
struct FleetTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl FleetTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        Ok(Self { _tmp: tmp, root })
    }

    fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    fn fleetcheck(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fleetcheck"));
        cmd.current_dir(&self.root);
        for var in [
            "FLEETCHECK_INVENTORY",
            "FLEETCHECK_RULES",
            "FLEETCHECK_PLUGINS",
            "FLEETCHECK_OUTPUT_DIR",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }
}

/// Snapshot with a single `settings(name, value)` table.
fn snapshot(path: &Path, sessions: i64) -> Result<()> {
    let conn = duckdb::Connection::open(path)?;
    conn.execute_batch(&format!(
        "CREATE TABLE settings (name VARCHAR, value BIGINT);
         INSERT INTO settings VALUES ('sessions', {sessions});"
    ))?;
    Ok(())
}

#[test]
fn test_checks_lists_builtins() -> Result<()> {
    let env = FleetTestEnv::new()?;
    env.fleetcheck()
        .arg("checks")
        .assert()
        .success()
        .stdout(predicate::str::contains("SESSIONS_MIN"))
        .stdout(predicate::str::contains("Storage & Disk Management"));
    Ok(())
}

#[test]
fn test_rules_marks_overrides() -> Result<()> {
    let env = FleetTestEnv::new()?;
    env.write("validation_rules.yaml", RULES)?;

    env.fleetcheck()
        .args(["rules", "--instance", "FREE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(override)"))
        .stdout(predicate::str::contains("100"));
    Ok(())
}

#[test]
fn test_missing_rules_file_is_fatal() -> Result<()> {
    let env = FleetTestEnv::new()?;
    env.write("databases.yaml", "databases:\n  PROD:\n    hostname: db1\n    service_name: prod\n    username: monitor\n")?;

    env.fleetcheck()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation rules"));
    Ok(())
}

#[test]
fn test_invalid_rule_value_is_fatal() -> Result<()> {
    let env = FleetTestEnv::new()?;
    env.write("validation_rules.yaml", "validation_rules:\n  defaults:\n    sessions_min: plenty\n")?;
    env.write("databases.yaml", "databases:\n  PROD:\n    hostname: db1\n    service_name: prod\n    username: monitor\n")?;

    env.fleetcheck()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("defaults.sessions_min"));
    Ok(())
}

#[test]
fn test_unreachable_instance_fails_the_run() -> Result<()> {
    let env = FleetTestEnv::new()?;
    env.write("validation_rules.yaml", RULES)?;
    env.write(
        "databases.yaml",
        "databases:\n  PROD:\n    hostname: db1.example.com\n    service_name: prod\n    username: monitor\n",
    )?;

    env.fleetcheck()
        .arg("run")
        .assert()
        .failure()
        .stdout(predicate::str::contains("UNREACHABLE"))
        .stdout(predicate::str::contains("PROD"));
    Ok(())
}

#[test]
fn test_end_to_end_against_snapshot() -> Result<()> {
    let env = FleetTestEnv::new()?;
    snapshot(&env.root.join("free.duckdb"), 472)?;
    env.write(
        "plugins/sessions.yml",
        "name: snapshot_sessions_min\n\
         display_name: SNAPSHOT_SESSIONS\n\
         category: performance\n\
         query: SELECT value FROM settings WHERE name = 'sessions'\n\
         validation: minimum\n",
    )?;
    env.write(
        "validation_rules.yaml",
        "validation_rules:\n  defaults:\n    snapshot_sessions_min: 1000\n  overrides:\n    FREE:\n      snapshot_sessions_min: 100\n",
    )?;
    env.write("databases.yaml", "databases:\n  FREE:\n    engine: duckdb\n    path: free.duckdb\n")?;

    env.fleetcheck()
        .args(["run", "--plugins", "plugins", "--format", "json", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SNAPSHOT_SESSIONS"))
        .stdout(predicate::str::contains("PASS"))
        .stdout(predicate::str::contains("HEALTHY"))
        .stdout(predicate::str::contains("(override)"));

    let written: Vec<_> = fs::read_dir(env.root.join("out"))?.collect::<Result<_, _>>()?;
    assert_eq!(written.len(), 1);
    Ok(())
}

#[test]
fn test_failing_check_exits_non_zero() -> Result<()> {
    let env = FleetTestEnv::new()?;
    snapshot(&env.root.join("prod.duckdb"), 50)?;
    env.write(
        "plugins/sessions.yml",
        "name: snapshot_sessions_min\ndisplay_name: SNAPSHOT_SESSIONS\ncategory: performance\nquery: SELECT value FROM settings WHERE name = 'sessions'\nvalidation: minimum\n",
    )?;
    env.write("validation_rules.yaml", "validation_rules:\n  defaults:\n    snapshot_sessions_min: 1000\n")?;
    env.write("databases.yaml", "databases:\n  PROD:\n    engine: duckdb\n    path: prod.duckdb\n")?;

    env.fleetcheck()
        .args(["run", "--plugins", "plugins"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("UNHEALTHY"));
    Ok(())
}
