// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The read-parse-execute loop.

use anyhow::Result;
use minnow_shell::exec::signals;
use minnow_shell::{Executor, Parser};
use tracing::debug;

use crate::editor::Editor;
use crate::reader::{BufferedStdin, LineSource, ReadLine};

const PROMPT: &str = "> ";

/// Behavior switches from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Parse without executing; implies `print_ast`.
    pub parser_only: bool,
    /// Print each parsed line as an indented tree.
    pub print_ast: bool,
    /// Line-buffered stdin instead of the raw-mode editor.
    pub no_term_input: bool,
}

/// Run the shell until end of input. Per-line failures are reported and
/// swallowed; only a broken line source ends the loop early.
pub fn run(opts: Options) -> Result<()> {
    let interactive = stdin_is_tty() && stdout_is_tty();
    let print_ast = opts.print_ast || opts.parser_only;
    let prompt = if interactive { PROMPT } else { "" };

    let mut source: Box<dyn LineSource> = if interactive && !opts.no_term_input {
        Box::new(Editor::new())
    } else {
        Box::new(BufferedStdin)
    };

    let executor = Executor::new(interactive);
    if !opts.parser_only {
        signals::install_sigchld_handler();
    }

    loop {
        let line = match source.read_line(prompt)? {
            ReadLine::Eof => break,
            ReadLine::Overflow => {
                eprintln!("minnow: line too long, discarded");
                continue;
            }
            ReadLine::Line(line) => line,
        };

        let ast = match Parser::parse(&line) {
            Ok(ast) => ast,
            Err(err) => {
                eprintln!("minnow: {err}\n{}", err.context(&line));
                continue;
            }
        };
        if ast.is_empty() {
            continue;
        }

        if print_ast {
            print!("{ast}");
        }
        if opts.parser_only {
            continue;
        }

        let status = executor.run(&ast);
        debug!(status, "line finished");
    }

    // Nothing may outlive the shell: collect every remaining child before
    // returning.
    if !opts.parser_only {
        signals::drain_children();
    }
    Ok(())
}

fn stdin_is_tty() -> bool {
    nix::unistd::isatty(libc::STDIN_FILENO).unwrap_or(false)
}

fn stdout_is_tty() -> bool {
    nix::unistd::isatty(libc::STDOUT_FILENO).unwrap_or(false)
}
