// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor: walks a parsed [`CommandList`] and runs it with `fork`/`execvp`.
//!
//! Each pipeline runs under an intermediate **group leader**: the shell
//! forks one leader per pipeline, the leader moves itself into its own
//! process group and (when the shell is interactive) takes the terminal
//! foreground, then forks one child per pipeline stage. The shell performs a
//! single `waitpid` on the leader and a single `tcsetpgrp` per pipeline,
//! however many stages there are.
//!
//! # Example
//!
//! ```no_run
//! use minnow_shell::{Executor, Parser};
//!
//! let ast = Parser::parse("cat < notes.txt | wc -l > count.txt")?;
//! let status = Executor::new(false).run(&ast);
//! assert_eq!(status, 0);
//! # Ok::<(), minnow_shell::ParseError>(())
//! ```
//!
//! # Status conventions
//!
//! - `0` — success.
//! - `1`–`255` — child exit code (an `execvp` failure exits `1`; a signaled
//!   last stage surfaces as `254`, the abnormal status truncated to the
//!   leader's 8-bit exit).
//! - [`STATUS_ABNORMAL`] (`-2`) — setup (redirect open / `pipe`) failed
//!   before anything was spawned, or the group leader itself was killed.
//!
//! # What is not handled here
//!
//! - **Builtins other than `cd`** — everything else is an external command.
//! - **Job control** (`fg`/`bg`/`jobs`) — background chains are detached
//!   and reaped by the SIGCHLD handler, nothing more.
//! - **Timeouts or cancellation** — the executor reacts only to child
//!   termination.

mod builtin;
pub mod error;
mod run;
pub mod signals;

pub use error::ExecError;

use crate::ast::CommandList;

/// Status reported when a pipeline terminated abnormally or could not be
/// set up.
pub const STATUS_ABNORMAL: i32 = -2;

/// Executes parsed command trees.
///
/// The executor itself is stateless apart from the interactivity flag; all
/// per-line state lives in the forked processes and the fd tables built for
/// each pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Executor {
    interactive: bool,
}

impl Executor {
    /// `interactive` says whether the shell owns a controlling terminal
    /// whose foreground should follow each synchronous pipeline.
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }

    /// Detect interactivity from stdin.
    pub fn from_tty() -> Self {
        Self::new(nix::unistd::isatty(libc::STDIN_FILENO).unwrap_or(false))
    }

    /// Execute one parsed line and return its exit status.
    ///
    /// Reinstates the SIGCHLD reaper before returning, so grandchildren of
    /// backgrounded chains are collected without zombies, whatever state
    /// the blocking waits left the disposition in.
    pub fn run(&self, list: &CommandList) -> i32 {
        let status = run::run_command_list(list, self.interactive);
        signals::install_sigchld_handler();
        status
    }
}
