// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flag handling and startup behavior.

use crate::prelude::*;

#[test]
fn help_lists_the_flags() {
    shell(&["--help"], "")
        .ok()
        .stdout_has("--parser-only")
        .stdout_has("--print-ast")
        .stdout_has("--no-term-input");
}

#[test]
fn version_prints_and_exits_zero() {
    shell(&["--version"], "").ok().stdout_has("minnow");
}

#[test]
fn unknown_flag_fails_startup_with_code_one() {
    shell(&["--bogus"], "").code(1).stderr_has("--bogus");
}

#[test]
fn eof_on_empty_input_exits_zero() {
    shell(&[], "").ok().stdout_empty().stderr_empty();
}

#[test]
fn no_term_input_still_reads_piped_lines() {
    shell(&["--no-term-input"], "echo ok\n").ok().stdout_eq("ok\n");
}

#[test]
fn print_ast_shows_tree_and_executes() {
    shell(&["--print-ast"], "echo hi\n")
        .ok()
        .stdout_has("cmd:echo, args:[hi]")
        .stdout_has("hi\n");
}

#[test]
fn parser_only_implies_print_ast() {
    shell(&["--parser-only"], "echo hi\n")
        .ok()
        .stdout_eq("cmd:echo, args:[hi]\n");
}
