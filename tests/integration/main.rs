// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests of the `forecastor-etc` binary. None of these need a
//! running compute service.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;
use tempfile::TempDir;

/// The binary, pointed at a store directory and an address nothing listens
/// on.
fn forecastor_etc(store_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("forecastor-etc").unwrap();
    cmd.env_remove("FORECASTOR_ETC_API_URL")
        .env_remove("RUST_LOG")
        .arg("--no-progress-bars")
        .arg("--store-dir")
        .arg(store_dir)
        .arg("--api-url")
        .arg("http://127.0.0.1:9/");
    cmd
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn make_file_in_dir<T: AsRef<Path>, U: AsRef<Path>>(filename: T, dir: U) -> (PathBuf, File) {
    let path = dir.as_ref().join(filename);
    let f = File::create(&path).expect("couldn't make file");
    (path, f)
}

#[test]
fn test_help() {
    let tmp = TempDir::new().unwrap();
    let cmd = forecastor_etc(tmp.path()).arg("--help").ok();
    let ok = cmd.is_ok();
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(ok, "help failed: {stderr}");
    for sub in ["status", "show", "open", "set", "save", "revert", "results", "reset"] {
        assert!(stdout.contains(sub), "{sub} missing from help:\n{stdout}");
    }
}

#[test]
fn test_status_of_a_new_session() {
    let tmp = TempDir::new().unwrap();
    let cmd = forecastor_etc(tmp.path()).arg("status").ok();
    let ok = cmd.is_ok();
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(ok, "status failed: {stderr}");
    assert!(stdout.contains("Active tab: Telescope"), "{stdout}");
    assert!(stdout.contains("http://127.0.0.1:9/"), "{stdout}");
    assert!(stdout.contains("Background (unavailable)"), "{stdout}");
}

#[test]
fn test_show_writes_defaults() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("telescope.toml");
    let cmd = forecastor_etc(tmp.path())
        .arg("show")
        .arg("telescope")
        .arg("--output")
        .arg(&out)
        .ok();
    let ok = cmd.is_ok();
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(ok, "show failed: {stderr}");
    assert!(stdout.contains("mirrorDiameter = 100"), "{stdout}");
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("mirrorDiameter = \"100\""), "{written}");
}

#[test]
fn test_opening_an_unavailable_tab_fails() {
    let tmp = TempDir::new().unwrap();
    let cmd = forecastor_etc(tmp.path()).arg("open").arg("background").ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Error:"), "{stderr}");
    assert!(stderr.contains("save the Telescope parameters first"), "{stderr}");
}

#[test]
fn test_dry_run_save_with_a_valid_args_file() {
    let tmp = TempDir::new().unwrap();
    let (args_file, mut f) = make_file_in_dir("telescope.toml", tmp.path());
    f.write_all(b"mirrorDiameter = \"120\"\n").unwrap();
    let cmd = forecastor_etc(tmp.path())
        .arg("--dry-run")
        .arg("save")
        .arg(&args_file)
        .ok();
    let ok = cmd.is_ok();
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(ok, "dry-run save failed: {stderr}");
    assert!(stdout.contains("nothing was sent"), "{stdout}");
}

#[test]
fn test_dry_run_save_with_invalid_values() {
    let tmp = TempDir::new().unwrap();
    let (args_file, mut f) = make_file_in_dir("telescope.toml", tmp.path());
    f.write_all(
        indoc! {r#"
            mirrorDiameter = "-1"
            readNoise = "lots"
        "#}
        .as_bytes(),
    )
    .unwrap();
    let cmd = forecastor_etc(tmp.path())
        .arg("--dry-run")
        .arg("save")
        .arg(&args_file)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Error:"), "{stderr}");
    assert!(stderr.contains("mirrorDiameter"), "{stderr}");
    assert!(stderr.contains("readNoise"), "{stderr}");
}

#[test]
fn test_args_file_with_an_unknown_extension() {
    let tmp = TempDir::new().unwrap();
    let (args_file, mut f) = make_file_in_dir("telescope.yaml", tmp.path());
    f.write_all(b"mirrorDiameter: 120\n").unwrap();
    let cmd = forecastor_etc(tmp.path())
        .arg("--dry-run")
        .arg("save")
        .arg(&args_file)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("recognised file extension"), "{stderr}");
}

#[test]
fn test_unreachable_service_is_reported() {
    let tmp = TempDir::new().unwrap();
    let cmd = forecastor_etc(tmp.path())
        .arg("--timeout")
        .arg("5")
        .arg("save")
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Check that the compute service is running"), "{stderr}");

    // Nothing was saved.
    let cmd = forecastor_etc(tmp.path()).arg("status").ok();
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Background (unavailable)"), "{stdout}");
}

#[test]
fn test_set_then_revert() {
    let tmp = TempDir::new().unwrap();
    let cmd = forecastor_etc(tmp.path())
        .arg("set")
        .arg("mirrorDiameter=120")
        .ok();
    let ok = cmd.is_ok();
    let (_, stderr) = get_cmd_output(cmd);
    assert!(ok, "set failed: {stderr}");

    let cmd = forecastor_etc(tmp.path()).arg("show").ok();
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("(unsaved changes)"), "{stdout}");
    assert!(stdout.contains("mirrorDiameter = 120"), "{stdout}");

    let cmd = forecastor_etc(tmp.path()).arg("revert").ok();
    assert!(cmd.is_ok());
    let cmd = forecastor_etc(tmp.path()).arg("show").ok();
    let (stdout, _) = get_cmd_output(cmd);
    assert!(!stdout.contains("(unsaved changes)"), "{stdout}");
    assert!(stdout.contains("mirrorDiameter = 100"), "{stdout}");
}
