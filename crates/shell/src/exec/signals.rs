// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SIGCHLD and terminal-foreground discipline.
//!
//! The shell keeps a reaping SIGCHLD handler installed while idle so that
//! detached children never become zombies. Around every blocking `waitpid`
//! the disposition is set back to default; otherwise the handler would
//! race the wait loop for the same children. `tcsetpgrp` from a
//! non-foreground group raises SIGTTOU, so every foreground transfer
//! ignores it for the duration of the call.

use nix::errno::Errno;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::waitpid;
use nix::unistd::Pid;

/// Raw SIGCHLD handler.
///
/// Reinstalls itself first (System-V signal semantics reset the
/// disposition on delivery), reaps every finished child without blocking,
/// and preserves errno for the interrupted code. Only async-signal-safe
/// libc calls in here.
extern "C" fn reap_finished(_signo: libc::c_int) {
    unsafe {
        let saved_errno = *libc::__errno_location();
        libc::signal(
            libc::SIGCHLD,
            reap_finished as extern "C" fn(libc::c_int) as libc::sighandler_t,
        );
        while libc::waitpid(-1, std::ptr::null_mut(), libc::WNOHANG) > 0 {}
        *libc::__errno_location() = saved_errno;
    }
}

/// Install the reaping handler. Called at shell startup and again after
/// every executed line.
pub fn install_sigchld_handler() {
    let _ = unsafe { signal::signal(Signal::SIGCHLD, SigHandler::Handler(reap_finished)) };
}

/// Restore the default disposition around a blocking wait.
pub fn set_sigchld_default() {
    let _ = unsafe { signal::signal(Signal::SIGCHLD, SigHandler::SigDfl) };
}

/// Make `pgid` the terminal foreground process group.
pub fn give_terminal_to(pgid: Pid) {
    let _ = unsafe { signal::signal(Signal::SIGTTOU, SigHandler::SigIgn) };
    let _ = nix::unistd::tcsetpgrp(libc::STDIN_FILENO, pgid);
    let _ = unsafe { signal::signal(Signal::SIGTTOU, SigHandler::SigDfl) };
}

/// Blocking reap of every remaining child. Called once at EOF so no
/// descendant outlives the shell's last line.
pub fn drain_children() {
    set_sigchld_default();
    loop {
        match waitpid(Pid::from_raw(-1), None) {
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(_) => break,
        }
    }
}
