// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tree walk: command lists, and-or chains, and the group-leader
//! pipeline dance.

use std::ffi::CString;
use std::os::unix::io::RawFd;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{self, close, dup2, fork, ForkResult, Pid};
use tracing::debug;

use super::builtin;
use super::error::ExecError;
use super::signals;
use super::STATUS_ABNORMAL;
use crate::ast::{AndOrList, CommandList, LogicalOp, Pipeline, Runnable, SimpleCommand};

const STDIN: RawFd = libc::STDIN_FILENO;
const STDOUT: RawFd = libc::STDOUT_FILENO;

/// (stdin, stdout) for one pipeline stage. Slots left at the std fds mean
/// "inherit".
#[derive(Debug, Clone, Copy)]
struct StageFds {
    stdin: RawFd,
    stdout: RawFd,
}

impl StageFds {
    const INHERIT: StageFds = StageFds {
        stdin: STDIN,
        stdout: STDOUT,
    };

    fn close_both(&self) {
        if self.stdin != STDIN {
            let _ = close(self.stdin);
        }
        if self.stdout != STDOUT {
            let _ = close(self.stdout);
        }
    }
}

fn close_all(stages: &[StageFds]) {
    for stage in stages {
        stage.close_both();
    }
}

/// Map an internal status to an exit code for `_exit` in subshell and
/// background children (abnormal statuses collapse to 1, as the original
/// exit-code space is 8-bit).
fn exit_code(status: i32) -> i32 {
    if status < 0 {
        1
    } else {
        status
    }
}

/// Execute the chains of a list in order. `&` chains are detached and
/// never awaited; the returned status is the last synchronous chain's
/// (0 when the list is empty or ends detached).
pub(super) fn run_command_list(list: &CommandList, interactive: bool) -> i32 {
    let mut status = 0;
    for item in &list.items {
        if item.background {
            spawn_background(&item.chain);
            status = 0;
        } else {
            status = run_and_or(&item.chain, interactive);
        }
    }
    status
}

/// Detach a whole and-or chain: the child becomes its own process group,
/// never touches the terminal, and is reaped later by the SIGCHLD handler.
fn spawn_background(chain: &AndOrList) {
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!(pid = child.as_raw(), "detached background chain");
        }
        Ok(ForkResult::Child) => {
            let pid = unistd::getpid();
            let _ = unistd::setpgid(pid, pid);
            let status = run_and_or(chain, false);
            unsafe { libc::_exit(exit_code(status)) };
        }
        Err(err) => {
            eprintln!("minnow: fork: {}", err.desc());
        }
    }
}

/// Left-to-right with short-circuit: `&&` stops the chain on failure,
/// `||` stops it on success.
fn run_and_or(chain: &AndOrList, interactive: bool) -> i32 {
    let mut status = run_pipeline(&chain.first, interactive);
    for (op, pipe) in &chain.rest {
        let stop = match op {
            LogicalOp::And => status != 0,
            LogicalOp::Or => status == 0,
        };
        if stop {
            return status;
        }
        status = run_pipeline(pipe, interactive);
    }
    status
}

/// Run one pipeline and return its status.
///
/// `cd` runs in-process. Everything else goes through the group leader:
/// the fd table is built here (so a setup failure aborts with
/// [`STATUS_ABNORMAL`] before any fork), inherited by the leader, and the
/// shell's own copies are closed immediately after the fork.
pub(super) fn run_pipeline(pipe: &Pipeline, interactive: bool) -> i32 {
    if pipe.is_cd {
        // The parser guarantees a lone `cd` command here.
        return match pipe.runnables.first().and_then(Runnable::as_command) {
            Some(cmd) => builtin::change_dir(cmd),
            None => STATUS_ABNORMAL,
        };
    }

    let stages = match setup_stage_fds(pipe) {
        Ok(stages) => stages,
        Err(err) => {
            eprintln!("minnow: {err}");
            return STATUS_ABNORMAL;
        }
    };

    debug!(stages = stages.len(), interactive, "starting pipeline");

    // Default disposition before the fork: the reaper must not steal the
    // leader from the blocking wait below. Restored by Executor::run.
    signals::set_sigchld_default();

    let leader = match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => child,
        Ok(ForkResult::Child) => {
            let status = lead_pipeline(pipe, &stages, interactive);
            unsafe { libc::_exit(status) };
        }
        Err(err) => {
            close_all(&stages);
            eprintln!("minnow: fork: {}", err.desc());
            return STATUS_ABNORMAL;
        }
    };

    // The leader inherited the table; the shell's copies must go or pipe
    // readers would never see EOF.
    close_all(&stages);

    let status = wait_for_leader(leader);

    if interactive {
        signals::give_terminal_to(unistd::getpgrp());
    }
    status
}

/// Block until the leader reports, collecting any other children that
/// finish in the meantime.
fn wait_for_leader(leader: Pid) -> i32 {
    loop {
        match waitpid(Pid::from_raw(-1), None) {
            Ok(WaitStatus::Exited(pid, code)) if pid == leader => return code,
            Ok(WaitStatus::Signaled(pid, signal, _)) if pid == leader => {
                eprintln!("minnow: terminated by signal {signal}");
                return STATUS_ABNORMAL;
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(_) => return 0,
        }
    }
}

/// Build the per-stage fd table: endpoint redirections and one pipe per
/// adjacent stage pair. On failure everything opened so far is closed.
fn setup_stage_fds(pipe: &Pipeline) -> Result<Vec<StageFds>, ExecError> {
    let mut stages = vec![StageFds::INHERIT; pipe.len()];

    if let Some(path) = &pipe.stdin_redir {
        let fd = open(path.as_str(), OFlag::O_RDONLY, Mode::empty()).map_err(|source| {
            ExecError::Redirect {
                path: path.clone(),
                source,
            }
        })?;
        if let Some(first) = stages.first_mut() {
            first.stdin = fd;
        }
    }

    if let Some(redir) = &pipe.stdout_redir {
        let mut flags = OFlag::O_WRONLY | OFlag::O_CREAT;
        flags |= if redir.is_append() {
            OFlag::O_APPEND
        } else {
            OFlag::O_TRUNC
        };
        match open(redir.path(), flags, Mode::from_bits_truncate(0o644)) {
            Ok(fd) => {
                if let Some(last) = stages.last_mut() {
                    last.stdout = fd;
                }
            }
            Err(source) => {
                close_all(&stages);
                return Err(ExecError::Redirect {
                    path: redir.path().to_string(),
                    source,
                });
            }
        }
    }

    for i in 1..stages.len() {
        match unistd::pipe() {
            Ok((read_end, write_end)) => {
                stages[i - 1].stdout = write_end;
                stages[i].stdin = read_end;
            }
            Err(source) => {
                close_all(&stages);
                return Err(ExecError::Pipe { source });
            }
        }
    }

    Ok(stages)
}

/// Body of the group leader.
///
/// Own process group, terminal foreground when interactive, one child per
/// stage, then wait for the last stage's pid. Its code (or
/// [`STATUS_ABNORMAL`] if it was signaled) becomes the leader's exit
/// status, after one non-blocking sweep for remaining stages.
fn lead_pipeline(pipe: &Pipeline, stages: &[StageFds], interactive: bool) -> i32 {
    let pid = unistd::getpid();
    let _ = unistd::setpgid(pid, pid);
    if interactive {
        signals::give_terminal_to(pid);
    }
    signals::set_sigchld_default();

    let mut last_pid = None;
    for (i, runnable) in pipe.runnables.iter().enumerate() {
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                // The child holds the live copies of this stage's fds now.
                if let Some(stage) = stages.get(i) {
                    stage.close_both();
                }
                last_pid = Some(child);
            }
            Ok(ForkResult::Child) => run_stage(runnable, i, stages),
            Err(err) => {
                eprintln!("minnow: fork: {}", err.desc());
                if let Some(rest) = stages.get(i..) {
                    close_all(rest);
                }
                break;
            }
        }
    }

    let Some(last_pid) = last_pid else {
        return STATUS_ABNORMAL;
    };

    let mut status = 0;
    loop {
        match waitpid(Pid::from_raw(-1), None) {
            Ok(WaitStatus::Exited(pid, code)) => {
                if pid == last_pid {
                    status = code;
                    break;
                }
            }
            Ok(WaitStatus::Signaled(pid, _, _)) => {
                if pid == last_pid {
                    status = STATUS_ABNORMAL;
                    break;
                }
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(_) => {
                status = 1;
                break;
            }
        }
    }

    // Stages left of the last one may still be draining; sweep whatever
    // has finished without blocking.
    while let Ok(state) = waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
        if state == WaitStatus::StillAlive {
            break;
        }
    }

    status
}

/// Body of one pipeline stage, already forked from the leader.
fn run_stage(runnable: &Runnable, index: usize, stages: &[StageFds]) -> ! {
    signals::set_sigchld_default();

    if let Some(stage) = stages.get(index) {
        if stage.stdin != STDIN {
            let _ = dup2(stage.stdin, STDIN);
        }
        if stage.stdout != STDOUT {
            let _ = dup2(stage.stdout, STDOUT);
        }
    }
    close_all(stages);

    match runnable {
        Runnable::Command(cmd) => exec_command(cmd),
        Runnable::Subshell(inner) => {
            let status = run_command_list(inner, false);
            unsafe { libc::_exit(exit_code(status)) }
        }
    }
}

/// `execvp` the command; only returns into the error path.
fn exec_command(cmd: &SimpleCommand) -> ! {
    match build_argv(cmd) {
        Ok(argv) => {
            if let Some(name) = argv.first() {
                if let Err(err) = unistd::execvp(name, &argv) {
                    eprintln!("{}: {}", cmd.name, err.desc());
                }
            }
        }
        Err(_) => {
            eprintln!("{}: invalid command string", cmd.name);
        }
    }
    unsafe { libc::_exit(1) }
}

fn build_argv(cmd: &SimpleCommand) -> Result<Vec<CString>, std::ffi::NulError> {
    let mut argv = Vec::with_capacity(cmd.args.len() + 1);
    argv.push(CString::new(cmd.name.as_str())?);
    for arg in &cmd.args {
        argv.push(CString::new(arg.as_str())?);
    }
    Ok(argv)
}
