// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `cd` builtin.
//!
//! `cd` must run in the shell process itself: a forked `chdir` would
//! change only the child's directory. The parser rejects every context
//! that would force a fork (pipelines, redirections, extra arguments).

use std::path::PathBuf;

use nix::unistd::{self, User};

use crate::ast::SimpleCommand;

/// Change the shell's working directory. `~` or no argument goes home.
/// Returns 0 on success, 1 on failure with a diagnostic on stderr.
pub(super) fn change_dir(cmd: &SimpleCommand) -> i32 {
    let target = match cmd.args.first() {
        Some(arg) if arg != "~" => PathBuf::from(arg),
        _ => match home_dir() {
            Some(dir) => dir,
            None => {
                eprintln!("cd: cannot determine home directory");
                return 1;
            }
        },
    };

    match unistd::chdir(&target) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("cd: {}: {}", target.display(), err.desc());
            1
        }
    }
}

/// `$HOME`, falling back to the passwd entry.
fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().or_else(|| {
        User::from_uid(unistd::getuid())
            .ok()
            .flatten()
            .map(|user| user.dir)
    })
}
