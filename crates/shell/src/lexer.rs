// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming lexer for a single shell input line.
//!
//! Tokens are produced one per [`Lexer::next_token`] call. The lexer has two
//! sub-states (skipping separators and accumulating a word) plus in-quotes
//! and escape handling inside words. One character of lookahead is enough
//! for every decision, including the greedy two-byte operators (`>>` before
//! `>`, `||` before `|`, `&&` before `&`).

use thiserror::Error;

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexical errors.
///
/// Both variants carry the byte position where the offending construct
/// started, for caret diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// A `"` was opened and never closed before end of line.
    #[error("unterminated double quote at position {}", span.start)]
    UnterminatedQuote {
        /// Location of the opening quote.
        span: Span,
    },

    /// A `\` at end of line with nothing to escape.
    #[error("dangling escape at position {}", span.start)]
    DanglingEscape {
        /// Location of the backslash.
        span: Span,
    },
}

impl LexerError {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnterminatedQuote { span } => *span,
            LexerError::DanglingEscape { span } => *span,
        }
    }
}

/// True for the bytes that separate tokens outside quotes.
#[inline]
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// True for the bytes that terminate an unquoted word and form operators.
#[inline]
fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '|' | '&' | ';' | '(' | ')')
}

/// Streaming tokenizer over one input line.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte position, for diagnostics.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Produce the next token.
    ///
    /// Once the line is exhausted this keeps returning [`TokenKind::Eol`].
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_blanks();

        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::Eol, Span::empty(start)));
        };

        let kind = match c {
            '<' => {
                self.bump(c);
                TokenKind::In
            }
            '>' => {
                self.bump(c);
                if self.eat('>') {
                    TokenKind::Append
                } else {
                    TokenKind::Out
                }
            }
            '|' => {
                self.bump(c);
                if self.eat('|') {
                    TokenKind::OrIf
                } else {
                    TokenKind::Pipe
                }
            }
            '&' => {
                self.bump(c);
                if self.eat('&') {
                    TokenKind::AndIf
                } else {
                    TokenKind::Background
                }
            }
            ';' => {
                self.bump(c);
                TokenKind::Semi
            }
            '(' => {
                self.bump(c);
                TokenKind::LParen
            }
            ')' => {
                self.bump(c);
                TokenKind::RParen
            }
            _ => return self.lex_word(),
        };

        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    /// Collect the whole token stream, ending with the `Eol` token.
    pub fn tokenize(input: &'a str) -> Result<Vec<Token>, LexerError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eol;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Accumulate a word: any run of bytes that is neither unquoted blank
    /// nor an unquoted operator byte. Quotes toggle verbatim mode and are
    /// not stored; a backslash stores the following byte verbatim.
    fn lex_word(&mut self) -> Result<Token, LexerError> {
        let start = self.pos;
        let mut text = String::new();
        let mut in_quotes = false;
        let mut quote_start = 0;

        loop {
            let Some(c) = self.peek() else {
                if in_quotes {
                    return Err(LexerError::UnterminatedQuote {
                        span: Span::new(quote_start, quote_start + 1),
                    });
                }
                break;
            };

            match c {
                '\\' => {
                    let esc = self.pos;
                    self.bump(c);
                    match self.peek() {
                        Some(next) => {
                            text.push(next);
                            self.bump(next);
                        }
                        None => {
                            return Err(LexerError::DanglingEscape {
                                span: Span::new(esc, esc + 1),
                            });
                        }
                    }
                }
                '"' => {
                    if !in_quotes {
                        quote_start = self.pos;
                    }
                    in_quotes = !in_quotes;
                    self.bump(c);
                }
                _ if !in_quotes && (is_blank(c) || is_operator_char(c)) => break,
                _ => {
                    text.push(c);
                    self.bump(c);
                }
            }
        }

        Ok(Token::new(TokenKind::Word(text), Span::new(start, self.pos)))
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    /// Consume `c` if it is next.
    #[inline]
    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump(c);
            true
        } else {
            false
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(c) = self.peek() {
            if !is_blank(c) {
                break;
            }
            self.bump(c);
        }
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
