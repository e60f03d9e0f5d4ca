// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Core of the minnow shell: lexer, parser, and fork/exec executor.
//!
//! One input line flows through three stages:
//!
//! ```text
//! line → Lexer → Parser → Executor → exit status
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use minnow_shell::{Executor, Parser};
//!
//! let ast = Parser::parse("echo hello | tr a-z A-Z")?;
//! let status = Executor::new(false).run(&ast);
//! assert_eq!(status, 0);
//! # Ok::<(), minnow_shell::ParseError>(())
//! ```
//!
//! # Grammar
//!
//! ```text
//! command_list := and_or_list ((';' | '&') and_or_list)*
//! and_or_list  := pipeline (('&&' | '||') pipeline)*
//! pipeline     := runnable ('|' runnable | '<' word | '>' word | '>>' word)*
//! runnable     := word word* | '(' command_list ')'
//! ```
//!
//! Words support double quotes and backslash escapes; no expansion of any
//! kind is performed.
//!
//! # Execution model
//!
//! Each pipeline runs under an intermediate **group leader** process: the
//! shell forks the leader, the leader puts itself in its own process group,
//! takes the terminal foreground when the shell is interactive, and forks
//! one child per pipeline stage. One `tcsetpgrp` and one top-level
//! `waitpid` per pipeline. `cd` never forks: the parser guarantees a
//! well-formed `cd` stands alone, and [`Executor`] runs it in-process.
//!
//! The AST for a line is built, executed, and dropped as a unit; see
//! [`ast`] for the ownership story.

pub mod ast;
pub mod exec;
mod lexer;
mod parse_error;
mod parser;
pub mod span;
mod token;

// AST types
pub use ast::{
    quote_word, AndOrList, CommandList, ListItem, LogicalOp, OutputRedirect, Pipeline, Runnable,
    SimpleCommand,
};

// Lexer
pub use lexer::{Lexer, LexerError};

// Parser
pub use parse_error::ParseError;
pub use parser::Parser;

// Executor
pub use exec::{Executor, STATUS_ABNORMAL};

// Spans & tokens
pub use span::{context_snippet, Span};
pub use token::{Token, TokenKind};
