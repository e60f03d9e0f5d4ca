// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser error types.

use thiserror::Error;

use crate::lexer::LexerError;
use crate::span::{context_snippet, Span};
use crate::token::TokenKind;

/// Errors from parsing one input line.
///
/// Every variant carries a byte position in the line; use
/// [`ParseError::context`] for a caret snippet.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The lexer rejected the line before the grammar was ever consulted.
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    /// A token that does not fit the grammar at this point.
    #[error("unexpected {found} at position {}, expected {expected}", span.start)]
    UnexpectedToken {
        /// The token that was found.
        found: TokenKind,
        /// What the parser was looking for.
        expected: String,
        span: Span,
    },

    /// A second redirection of the same direction in one pipeline.
    #[error("duplicate {direction} redirection at position {}", span.start)]
    DuplicateRedirection {
        /// `"input"` or `"output"`.
        direction: &'static str,
        span: Span,
    },

    /// `cd` in a context that would force it into a subprocess, where it
    /// could not change the shell's own directory.
    #[error("cd cannot be used {context}")]
    InvalidCd {
        context: &'static str,
        span: Span,
    },
}

impl ParseError {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lexer(e) => e.span(),
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::DuplicateRedirection { span, .. } => *span,
            ParseError::InvalidCd { span, .. } => *span,
        }
    }

    /// Render the offending line with a caret under the error location.
    pub fn context(&self, input: &str) -> String {
        context_snippet(input, self.span())
    }
}
