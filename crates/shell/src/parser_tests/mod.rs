// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod redirections;
mod subshells;

use super::Parser;
use crate::ast::{CommandList, LogicalOp, Pipeline, Runnable, SimpleCommand};
use crate::parse_error::ParseError;
use crate::token::TokenKind;

fn parse(input: &str) -> CommandList {
    match Parser::parse(input) {
        Ok(list) => list,
        Err(err) => panic!("parse failed for {input:?}: {err}"),
    }
}

fn parse_err(input: &str) -> ParseError {
    match Parser::parse(input) {
        Ok(list) => panic!("expected error for {input:?}, got: {list:?}"),
        Err(err) => err,
    }
}

/// The single pipeline of a one-chain, no-connective line.
fn only_pipeline(list: &CommandList) -> &Pipeline {
    assert_eq!(list.items.len(), 1, "expected one chain: {list:?}");
    let chain = &list.items[0].chain;
    assert!(chain.rest.is_empty(), "expected one pipeline: {chain:?}");
    &chain.first
}

fn only_command(list: &CommandList) -> &SimpleCommand {
    let pipe = only_pipeline(list);
    assert_eq!(pipe.len(), 1, "expected one runnable: {pipe:?}");
    match &pipe.runnables[0] {
        Runnable::Command(cmd) => cmd,
        other => panic!("expected a command, got: {other:?}"),
    }
}

fn stage_names(pipe: &Pipeline) -> Vec<&str> {
    pipe.runnables
        .iter()
        .map(|r| match r {
            Runnable::Command(cmd) => cmd.name.as_str(),
            Runnable::Subshell(_) => "(",
        })
        .collect()
}

#[test]
fn empty_line_parses_to_empty_list() {
    assert!(parse("").is_empty());
    assert!(parse("   \t  ").is_empty());
}

#[test]
fn simple_command_with_args() {
    let list = parse("grep -v foo bar.txt");
    let cmd = only_command(&list);
    assert_eq!(cmd.name, "grep");
    assert_eq!(cmd.args, vec!["-v", "foo", "bar.txt"]);
}

#[test]
fn quoted_argument_stays_one_word() {
    let list = parse(r#"printf %s "a b c""#);
    let cmd = only_command(&list);
    assert_eq!(cmd.args, vec!["%s", "a b c"]);
}

#[test]
fn pipeline_of_three_stages() {
    let list = parse("cat notes | grep x | wc -l");
    let pipe = only_pipeline(&list);
    assert_eq!(stage_names(pipe), vec!["cat", "grep", "wc"]);
    assert!(!pipe.is_cd);
}

#[test]
fn and_or_chain_keeps_operator_order() {
    let list = parse("a && b || c");
    assert_eq!(list.items.len(), 1);
    let chain = &list.items[0].chain;
    let ops: Vec<LogicalOp> = chain.rest.iter().map(|(op, _)| *op).collect();
    assert_eq!(ops, vec![LogicalOp::And, LogicalOp::Or]);
}

#[test]
fn semicolons_split_chains() {
    let list = parse("a ; b ; c");
    assert_eq!(list.items.len(), 3);
    assert!(list.items.iter().all(|item| !item.background));
}

#[test]
fn trailing_and_repeated_semicolons_are_skipped() {
    assert_eq!(parse("a ;").items.len(), 1);
    assert_eq!(parse("a ; ; b").items.len(), 2);
    assert_eq!(parse("; a").items.len(), 1);
}

#[test]
fn ampersand_backgrounds_the_chain_it_follows() {
    let list = parse("a & b");
    assert_eq!(list.items.len(), 2);
    assert!(list.items[0].background);
    assert!(!list.items[1].background);
}

#[test]
fn ampersand_detaches_a_whole_and_or_chain() {
    // `a && b &` runs the whole chain in the background
    let list = parse("a && b &");
    assert_eq!(list.items.len(), 1);
    let item = &list.items[0];
    assert!(item.background);
    assert_eq!(item.chain.rest.len(), 1);
}

#[test]
fn missing_command_after_connective_is_an_error() {
    for input in ["a &&", "a ||", "a && ;"] {
        match parse_err(input) {
            ParseError::UnexpectedToken { .. } => {}
            other => panic!("expected UnexpectedToken for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn leading_operators_are_errors() {
    for input in ["| a", "&& a", "& a", "a ; | b"] {
        match parse_err(input) {
            ParseError::UnexpectedToken { .. } => {}
            other => panic!("expected UnexpectedToken for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn double_pipe_gap_is_an_error() {
    let err = parse_err("echo | | bad");
    match err {
        ParseError::UnexpectedToken { found, span, .. } => {
            assert_eq!(found, TokenKind::Pipe);
            assert_eq!(span.start, 7);
        }
        other => panic!("expected UnexpectedToken, got {other:?}"),
    }
}

#[test]
fn lexer_errors_surface_through_parse() {
    let err = parse_err(r#"echo "unterminated"#);
    assert!(matches!(err, ParseError::Lexer(_)));
}

#[test]
fn error_spans_stay_within_the_line() {
    for input in ["a && ", "(", "echo |", r#"x ""#, "cd a b c", "a < b < c"] {
        let err = parse_err(input);
        assert!(err.span().start <= input.len(), "input: {input:?}");
    }
}

#[test]
fn lone_cd_is_classified_builtin() {
    for input in ["cd", "cd /tmp", "cd ~"] {
        let list = parse(input);
        assert!(only_pipeline(&list).is_cd, "input: {input:?}");
    }
}

#[test]
fn cd_in_pipeline_is_rejected() {
    for input in ["echo x | cd /tmp", "cd /tmp | cat"] {
        match parse_err(input) {
            ParseError::InvalidCd { context, .. } => assert_eq!(context, "in a pipeline"),
            other => panic!("expected InvalidCd for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn cd_with_extra_arguments_is_rejected() {
    match parse_err("cd a b") {
        ParseError::InvalidCd { context, .. } => {
            assert_eq!(context, "with more than one argument");
        }
        other => panic!("expected InvalidCd, got {other:?}"),
    }
}

#[test]
fn cd_with_redirections_is_rejected() {
    for input in ["cd /tmp > log", "cd < here"] {
        match parse_err(input) {
            ParseError::InvalidCd { context, .. } => assert_eq!(context, "with redirections"),
            other => panic!("expected InvalidCd for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn cd_chains_are_allowed_outside_pipes() {
    // `cd` joined by `&&` / `;` is fine, each pipeline stands alone
    let list = parse("cd /tmp && pwd");
    assert!(list.items[0].chain.first.is_cd);
    assert!(!list.items[0].chain.rest[0].1.is_cd);
}

#[test]
fn count_commands_spans_the_whole_tree() {
    let list = parse("a | ( b ; c ) && d");
    assert_eq!(list.count_commands(), 4);
}

#[test]
fn canonical_rendering_is_a_fixed_point() {
    for input in [
        "echo hello | tr a-z A-Z",
        r#"printf %s "a b" > out ; cat < in"#,
        "( a ; b & c ) | d >> log && e || f &",
        "cd /tmp && pwd",
    ] {
        let first = parse(input).to_command_line();
        let second = parse(&first).to_command_line();
        assert_eq!(first, second, "input: {input:?}");
    }
}
