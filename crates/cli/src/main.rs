// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! minnow - a small interactive Unix shell.

mod complete;
mod editor;
mod linebuf;
mod reader;
mod repl;

use std::process::ExitCode;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "minnow",
    version,
    about = "A small interactive Unix shell: pipelines, redirections, subshells"
)]
struct Cli {
    /// Parse lines without executing them (implies --print-ast)
    #[arg(long)]
    parser_only: bool,

    /// Print each parsed line as an indented tree
    #[arg(long)]
    print_ast: bool,

    /// Read line-buffered stdin instead of using the raw-mode line editor
    #[arg(long)]
    no_term_input: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too; only real errors fail.
            let failed = err.use_stderr();
            let _ = err.print();
            return if failed {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging();

    let opts = repl::Options {
        parser_only: cli.parser_only,
        print_ast: cli.print_ast,
        no_term_input: cli.no_term_input,
    };
    match repl::run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("minnow: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
