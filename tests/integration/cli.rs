//! The `logwrap` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[allow(deprecated)]
fn logwrap() -> Command {
    let mut cmd = Command::cargo_bin("logwrap").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/tmp/logwrap-test-no-config");
    cmd
}

#[test]
fn lines_are_logged_at_info() {
    logwrap()
        .arg("--color=never")
        .write_stdin("hello\nworld\n")
        .assert()
        .success()
        .stdout("   INFO: hello\n   INFO: world\n");
}

#[test]
fn tags_prefix_every_line() {
    logwrap()
        .args(["--color=never", "--tag", "api", "--tag=v2"])
        .write_stdin("ready\n")
        .assert()
        .success()
        .stdout("   INFO: [api][v2]ready\n");
}

#[test]
fn threshold_drops_verbose_lines() {
    logwrap()
        .args(["--color=never", "--emit-level=debug"])
        .write_stdin("noise\n")
        .assert()
        .success()
        .stdout("")
        .stderr("");
}

#[test]
fn debug_lines_go_to_stderr_when_enabled() {
    logwrap()
        .args(["--color=never", "--level=silly", "--emit-level=debug"])
        .write_stdin("detail\n")
        .assert()
        .success()
        .stdout("")
        .stderr("  DEBUG: detail\n");
}

#[test]
fn custom_timestamp_format() {
    logwrap()
        .args(["--color=never", "--timestamp=%Y"])
        .write_stdin("tick\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^   INFO: \[\d{4}\]tick\n$").unwrap());
}

#[test]
fn default_timestamp_format() {
    logwrap()
        .args(["--color=never", "--timestamp", "--tag=t"])
        .write_stdin("tick\n")
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^   INFO: \[\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z\]\[t\]tick\n$")
                .unwrap(),
        );
}

#[test]
fn call_location_points_into_the_binary() {
    logwrap()
        .args(["--color=never", "--call-location", "--tag=cli"])
        .arg(format!("--project-root={}/", env!("CARGO_MANIFEST_DIR")))
        .write_stdin("hello\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^   INFO: \[src/main\.rs:\d+:\d+\]\[cli\]hello\n$").unwrap());
}

#[test]
fn invalid_level_flag_is_rejected() {
    logwrap()
        .arg("--level=loud")
        .write_stdin("x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid level 'loud'"));
}

#[test]
fn bad_timestamp_format_exits_1() {
    logwrap()
        .args(["--color=never", "--timestamp=%"])
        .write_stdin("x\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("logwrap: invalid argument"));
}

#[test]
fn config_file_settings_apply() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "tags = [\"cfg\"]\nlevel = \"warn\"\nstderr_levels = [\"warn\"]\ncolor = \"never\""
    )
    .unwrap();

    logwrap()
        .arg("--config")
        .arg(file.path())
        .args(["--emit-level=warn", "--tag=cli"])
        .write_stdin("disk low\n")
        .assert()
        .success()
        .stdout("")
        .stderr("   WARN: [cfg][cli]disk low\n");

    logwrap()
        .arg("--config")
        .arg(file.path())
        .write_stdin("suppressed\n")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn invalid_config_file_exits_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "level = \"loud\"").unwrap();

    logwrap()
        .arg("--config")
        .arg(file.path())
        .write_stdin("x\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("level \"loud\" is invalid"));
}

#[test]
fn completions_are_printed() {
    logwrap()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("logwrap"));
}
