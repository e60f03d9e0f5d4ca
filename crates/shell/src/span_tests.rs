// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn slice_extracts_spanned_text() {
    let source = "echo hello";
    assert_eq!(Span::new(5, 10).slice(source), "hello");
    assert_eq!(Span::new(0, 4).slice(source), "echo");
}

#[test]
fn slice_out_of_bounds_is_empty() {
    assert_eq!(Span::new(5, 20).slice("short"), "");
}

#[test]
fn merge_covers_both_spans() {
    let merged = Span::new(4, 7).merge(Span::new(10, 12));
    assert_eq!(merged, Span::new(4, 12));

    // Order does not matter
    let merged = Span::new(10, 12).merge(Span::new(4, 7));
    assert_eq!(merged, Span::new(4, 12));
}

#[test]
fn empty_span_has_zero_len() {
    let span = Span::empty(3);
    assert!(span.is_empty());
    assert_eq!(span.len(), 0);
    assert_eq!(span.start, 3);
}

#[test]
fn context_snippet_points_at_span() {
    let snippet = context_snippet("echo | | bad", Span::new(7, 8));
    assert_eq!(snippet, "echo | | bad\n       ^");
}

#[test]
fn context_snippet_clamps_past_end() {
    // An end-of-line error points one past the last byte
    let snippet = context_snippet("abc", Span::empty(3));
    assert_eq!(snippet, "abc\n   ^");
}
