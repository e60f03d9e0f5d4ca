// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing behavior observed through `--parser-only`: AST shapes on
//! stdout, diagnostics on stderr, and the loop surviving bad lines.

use crate::prelude::*;

fn parse(script: &str) -> ShellRun {
    shell(&["--parser-only"], script)
}

#[test]
fn pipeline_tree_shape() {
    parse("echo hello | tr a-z A-Z\n").ok().stdout_eq(
        "cmd:echo, args:[hello]\n\
         |\n\
         cmd:tr, args:[a-z, A-Z]\n",
    );
}

#[test]
fn redirections_print_under_the_pipeline() {
    parse("cat < in | sort > out\n").ok().stdout_eq(
        "cmd:cat, args:[]\n\
         |\n\
         cmd:sort, args:[]\n\
         stdin -> in\n\
         stdout -> out\n",
    );
    parse("echo x >> log\n").ok().stdout_eq(
        "cmd:echo, args:[x]\n\
         stdout -> append to log\n",
    );
}

#[test]
fn subshell_tree_is_indented() {
    parse("( sleep 0 ; echo deep ) | cat\n").ok().stdout_eq(
        "(\n\
         \x20\x20cmd:sleep, args:[0]\n\
         \x20\x20;\n\
         \x20\x20cmd:echo, args:[deep]\n\
         )\n\
         |\n\
         cmd:cat, args:[]\n",
    );
}

#[test]
fn chain_joins_print_between_items() {
    parse("a && b ; c &\n").ok().stdout_eq(
        "cmd:a, args:[]\n\
         &&\n\
         cmd:b, args:[]\n\
         ;\n\
         cmd:c, args:[]\n\
         &\n",
    );
}

#[test]
fn parser_only_does_not_execute() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    parse(&format!("echo hi > {}\n", out.display()))
        .ok()
        .stdout_has("stdout -> ");
    assert!(!out.exists());
}

#[test]
fn empty_lines_produce_nothing() {
    parse("\n\n   \n").ok().stdout_empty().stderr_empty();
}

#[test]
fn lexer_error_is_reported_and_loop_continues() {
    parse("echo \"unterminated\necho ok\n")
        .ok()
        .stderr_has("unterminated double quote")
        .stdout_eq("cmd:echo, args:[ok]\n");
}

#[test]
fn dangling_escape_is_reported() {
    parse("echo oops\\\n").ok().stderr_has("dangling escape");
}

#[test]
fn parse_error_comes_with_a_caret() {
    let run = parse("echo | | bad\n").ok().stderr_has("unexpected");
    assert!(run.stderr.contains('^'), "no caret in: {}", run.stderr);
}

#[test]
fn cd_misuse_is_a_parse_error() {
    parse("cd a b\n").ok().stderr_has("cd cannot be used");
    parse("echo x | cd y\n").ok().stderr_has("in a pipeline");
    parse("cd x > log\n").ok().stderr_has("with redirections");
}

#[test]
fn duplicate_redirection_is_reported() {
    parse("a > x >> y\n")
        .ok()
        .stderr_has("duplicate output redirection");
}

#[test]
fn unmatched_parenthesis_is_reported() {
    parse("( echo hi\n").ok().stderr_has("expected ')'");
}

#[test]
fn overlong_line_is_discarded_and_reading_resumes() {
    let long = "x".repeat(5000);
    parse(&format!("echo {long}\necho ok\n"))
        .ok()
        .stderr_has("line too long")
        .stdout_eq("cmd:echo, args:[ok]\n");
}
