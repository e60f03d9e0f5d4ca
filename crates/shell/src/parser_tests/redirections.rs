// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ast::OutputRedirect;

#[test]
fn stdin_redirection() {
    let list = parse("wc -l < data.txt");
    let pipe = only_pipeline(&list);
    assert_eq!(pipe.stdin_redir.as_deref(), Some("data.txt"));
    assert_eq!(pipe.stdout_redir, None);
}

#[test]
fn stdout_truncate_redirection() {
    let list = parse("echo hi > out.txt");
    let pipe = only_pipeline(&list);
    assert_eq!(
        pipe.stdout_redir,
        Some(OutputRedirect::Truncate("out.txt".into()))
    );
}

#[test]
fn stdout_append_redirection() {
    let list = parse("echo hi >> log.txt");
    let pipe = only_pipeline(&list);
    assert_eq!(
        pipe.stdout_redir,
        Some(OutputRedirect::Append("log.txt".into()))
    );
}

#[test]
fn both_endpoints_redirected_across_a_pipe() {
    let list = parse("cat < in | sort > out");
    let pipe = only_pipeline(&list);
    assert_eq!(pipe.len(), 2);
    assert_eq!(pipe.stdin_redir.as_deref(), Some("in"));
    assert_eq!(pipe.stdout_redir, Some(OutputRedirect::Truncate("out".into())));
}

#[test]
fn redirections_may_precede_later_pipe_stages() {
    // The redirection belongs to the pipeline, wherever it is written
    let list = parse("a > out | b");
    let pipe = only_pipeline(&list);
    assert_eq!(pipe.len(), 2);
    assert_eq!(pipe.stdout_redir, Some(OutputRedirect::Truncate("out".into())));

    let list = parse("a | b < in");
    let pipe = only_pipeline(&list);
    assert_eq!(pipe.stdin_redir.as_deref(), Some("in"));
}

#[test]
fn quoted_target_keeps_blanks() {
    let list = parse(r#"echo x > "a b.txt""#);
    let pipe = only_pipeline(&list);
    assert_eq!(
        pipe.stdout_redir,
        Some(OutputRedirect::Truncate("a b.txt".into()))
    );
}

#[test]
fn duplicate_input_redirection_is_an_error() {
    match parse_err("a < x < y") {
        ParseError::DuplicateRedirection { direction, .. } => assert_eq!(direction, "input"),
        other => panic!("expected DuplicateRedirection, got {other:?}"),
    }
}

#[test]
fn truncate_and_append_conflict() {
    for input in ["a > x >> y", "a >> x > y", "a > x > y"] {
        match parse_err(input) {
            ParseError::DuplicateRedirection { direction, .. } => {
                assert_eq!(direction, "output");
            }
            other => panic!("expected DuplicateRedirection for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn redirection_needs_a_target_word() {
    for input in ["a >", "a <", "a > > b", "a > | b"] {
        match parse_err(input) {
            ParseError::UnexpectedToken { expected, .. } => {
                assert_eq!(expected, "a redirection target");
            }
            other => panic!("expected UnexpectedToken for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn words_after_a_redirection_target_are_errors() {
    match parse_err("cat < in extra") {
        ParseError::UnexpectedToken { expected, .. } => {
            assert_eq!(expected, "an operator or end of command");
        }
        other => panic!("expected UnexpectedToken, got {other:?}"),
    }
}

#[test]
fn each_pipeline_in_a_chain_redirects_independently() {
    let list = parse("a > one && b > two");
    let chain = &list.items[0].chain;
    assert_eq!(
        chain.first.stdout_redir,
        Some(OutputRedirect::Truncate("one".into()))
    );
    assert_eq!(
        chain.rest[0].1.stdout_redir,
        Some(OutputRedirect::Truncate("two".into()))
    );
}
