// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end execution through the binary: pipelines, chains,
//! redirections, subshells, cd, and background reaping.

use std::fs;

use crate::prelude::*;

#[test]
fn pipeline_uppercases_through_tr() {
    shell(&[], "echo hello | tr a-z A-Z\n")
        .ok()
        .stdout_eq("HELLO\n");
}

#[test]
fn and_short_circuits_but_semicolon_does_not() {
    shell(&[], "false && echo x ; echo y\n").ok().stdout_eq("y\n");
}

#[test]
fn or_rescues_a_failure() {
    shell(&[], "false || echo rescued\n")
        .ok()
        .stdout_eq("rescued\n");
}

#[test]
fn redirections_write_truncate_and_append() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let script = format!(
        "echo one > {out}\necho two >> {out}\ncat < {out}\n",
        out = out.display()
    );

    shell(&[], &script).ok().stdout_eq("one\ntwo\n");
    assert_eq!(fs::read_to_string(&out).unwrap(), "one\ntwo\n");
}

#[test]
fn subshell_pipes_into_cat() {
    shell(&[], "( sleep 0 ; echo deep ) | cat\n")
        .ok()
        .stdout_eq("deep\n");
}

#[test]
fn subshell_runs_in_its_own_process() {
    // cd inside the subshell must not leak into the parent shell
    shell(&[], "( cd /tmp ; pwd ) ; pwd\n")
        .ok()
        .stdout_has("/tmp\n");
    let run = shell(&[], "cd / ; ( cd /tmp ) ; pwd\n").ok();
    assert_eq!(run.stdout, "/\n");
}

#[test]
fn cd_changes_directory_for_later_lines() {
    shell(&[], "cd /tmp\npwd\n").ok().stdout_eq("/tmp\n");
}

#[test]
fn cd_without_argument_returns_home() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().canonicalize().unwrap();
    let output = minnow()
        .env("HOME", &home)
        .write_stdin("cd /tmp ; pwd ; cd ; pwd\n".to_string())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("/tmp\n{}\n", home.display())
    );
}

#[test]
fn unknown_command_reports_and_continues() {
    shell(&[], "nonexistent_cmd_xyz\necho still here\n")
        .ok()
        .stderr_has("nonexistent_cmd_xyz")
        .stdout_eq("still here\n");
}

#[test]
fn signaled_pipeline_does_not_kill_the_shell() {
    shell(&[], "sh -c \"kill -KILL $$\" | sh -c \"kill -KILL $$\"\necho on we go\n")
        .ok()
        .stdout_eq("on we go\n");
}

#[test]
fn background_children_are_reaped_before_exit() {
    let dir = tempfile::tempdir().unwrap();
    let flag = dir.path().join("flag");
    let script = format!("sh -c \"sleep 0.2; echo done > {}\" &\n", flag.display());

    shell(&[], &script).ok();

    // The shell blocks at EOF until every background child is collected,
    // so the file must exist the moment the process has exited.
    assert_eq!(fs::read_to_string(&flag).unwrap(), "done\n");
}

#[test]
fn quoting_protects_operators_from_the_grammar() {
    shell(&[], "echo \"a | b && c\"\n").ok().stdout_eq("a | b && c\n");
    shell(&[], "echo a\\;b\n").ok().stdout_eq("a;b\n");
}

#[test]
fn line_failures_never_kill_the_shell() {
    let script = "echo | | bad\n\
                  echo \"open\n\
                  cd too many args\n\
                  echo survived\n";
    shell(&[], script).ok().stdout_eq("survived\n");
}
