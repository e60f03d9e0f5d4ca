// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for redirections and the `cd` builtin.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::env;
use std::fs;
use std::path::PathBuf;

use minnow_shell::{Executor, Parser};
use serial_test::serial;
use tempfile::TempDir;

fn run(line: &str) -> i32 {
    let ast = Parser::parse(line).unwrap();
    Executor::new(false).run(&ast)
}

fn path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).display().to_string()
}

fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

/// Restores the test process's working directory on drop.
struct CwdGuard(PathBuf);

impl CwdGuard {
    fn hold() -> Self {
        Self(env::current_dir().unwrap())
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.0);
    }
}

#[test]
#[serial]
fn stdout_redirect_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let out = path(&dir, "out");

    assert_eq!(run(&format!("echo first > {out}")), 0);
    assert_eq!(read(&dir, "out"), "first\n");

    // A second `>` replaces, not appends
    assert_eq!(run(&format!("echo second > {out}")), 0);
    assert_eq!(read(&dir, "out"), "second\n");
}

#[test]
#[serial]
fn stdout_redirect_appends() {
    let dir = tempfile::tempdir().unwrap();
    let log = path(&dir, "log");

    assert_eq!(run(&format!("echo one >> {log}")), 0);
    assert_eq!(run(&format!("echo two >> {log}")), 0);
    assert_eq!(read(&dir, "log"), "one\ntwo\n");
}

#[test]
#[serial]
fn stdin_redirect_feeds_first_stage() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in"), "from a file\n").unwrap();
    let (input, out) = (path(&dir, "in"), path(&dir, "out"));

    assert_eq!(run(&format!("cat < {input} > {out}")), 0);
    assert_eq!(read(&dir, "out"), "from a file\n");
}

#[test]
#[serial]
fn pipeline_transforms_between_redirected_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in"), "hello\n").unwrap();
    let (input, out) = (path(&dir, "in"), path(&dir, "out"));

    assert_eq!(run(&format!("cat < {input} | tr a-z A-Z > {out}")), 0);
    assert_eq!(read(&dir, "out"), "HELLO\n");
}

#[test]
#[serial]
fn three_stage_pipeline_runs_concurrently_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let out = path(&dir, "out");

    assert_eq!(run(&format!("printf abc | tr a-c A-C | cat > {out}")), 0);
    assert_eq!(read(&dir, "out"), "ABC");
}

#[test]
#[serial]
fn failed_stage_does_not_block_the_pipe() {
    let dir = tempfile::tempdir().unwrap();
    let out = path(&dir, "out");

    let status = run(&format!("sh -c \"echo data; exit 1\" | cat > {out}"));
    assert_eq!(status, 0);
    assert_eq!(read(&dir, "out"), "data\n");
}

#[test]
#[serial]
fn quoted_words_reach_the_command_intact() {
    let dir = tempfile::tempdir().unwrap();
    let out = path(&dir, "out");

    assert_eq!(run(&format!("printf %s \"a b\" > {out}")), 0);
    assert_eq!(read(&dir, "out"), "a b");
}

#[test]
#[serial]
fn cd_changes_the_shell_directory() {
    let _guard = CwdGuard::hold();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().canonicalize().unwrap();

    assert_eq!(run(&format!("cd {}", target.display())), 0);
    assert_eq!(env::current_dir().unwrap(), target);
}

#[test]
#[serial]
fn cd_persists_across_lines() {
    let _guard = CwdGuard::hold();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().canonicalize().unwrap();
    let out = path(&dir, "out");

    assert_eq!(run(&format!("cd {}", target.display())), 0);
    assert_eq!(run(&format!("pwd > {out}")), 0);
    assert_eq!(read(&dir, "out").trim_end(), target.display().to_string());
}

#[test]
#[serial]
fn cd_without_argument_goes_home() {
    let _guard = CwdGuard::hold();
    let home = dirs::home_dir().unwrap();

    assert_eq!(run("cd"), 0);
    assert_eq!(env::current_dir().unwrap(), home.canonicalize().unwrap());
}

#[test]
#[serial]
fn cd_to_missing_directory_fails() {
    let _guard = CwdGuard::hold();
    let before = env::current_dir().unwrap();

    assert_eq!(run("cd /definitely/not/a/directory"), 1);
    assert_eq!(env::current_dir().unwrap(), before);
}

#[test]
#[serial]
fn cd_inside_a_subshell_stays_inside() {
    let _guard = CwdGuard::hold();
    let before = env::current_dir().unwrap();

    assert_eq!(run("( cd /tmp )"), 0);
    assert_eq!(env::current_dir().unwrap(), before);
}
