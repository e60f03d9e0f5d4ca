// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.

#![allow(dead_code)]

use std::process::ExitStatus;

use assert_cmd::Command;

/// A Command for the built minnow binary.
pub fn minnow() -> Command {
    Command::cargo_bin("minnow").expect("minnow binary not built")
}

/// Feed a script to a fresh shell over stdin and capture everything.
pub fn shell(args: &[&str], script: &str) -> ShellRun {
    let output = minnow()
        .args(args)
        .write_stdin(script.to_string())
        .output()
        .expect("failed to run minnow");
    ShellRun {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status,
    }
}

/// Captured result of one shell invocation, with chainable assertions.
pub struct ShellRun {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

impl ShellRun {
    #[track_caller]
    pub fn ok(self) -> Self {
        assert!(
            self.status.success(),
            "expected success, got {:?}\nstderr: {}",
            self.status.code(),
            self.stderr
        );
        self
    }

    #[track_caller]
    pub fn code(self, expected: i32) -> Self {
        assert_eq!(
            self.status.code(),
            Some(expected),
            "stderr: {}",
            self.stderr
        );
        self
    }

    #[track_caller]
    pub fn stdout_eq(self, expected: &str) -> Self {
        assert_eq!(self.stdout, expected, "stderr: {}", self.stderr);
        self
    }

    #[track_caller]
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    #[track_caller]
    pub fn stdout_empty(self) -> Self {
        assert!(self.stdout.is_empty(), "unexpected stdout:\n{}", self.stdout);
        self
    }

    #[track_caller]
    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {needle:?}:\n{}",
            self.stderr
        );
        self
    }

    #[track_caller]
    pub fn stderr_empty(self) -> Self {
        assert!(self.stderr.is_empty(), "unexpected stderr:\n{}", self.stderr);
        self
    }
}
