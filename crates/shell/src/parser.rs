// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser over the token stream.
//!
//! Four mutually recursive productions:
//!
//! ```text
//! command_list := and_or_list ((';' | '&') and_or_list)*
//! and_or_list  := pipeline (('&&' | '||') pipeline)*
//! pipeline     := runnable ('|' runnable | '<' word | '>' word | '>>' word)*
//! runnable     := word word*            -- a command
//!               | '(' command_list ')'  -- a subshell
//! ```
//!
//! Every production returns the separator token that ended it (seen but
//! not absorbed by the deeper level), so the caller decides whether the
//! terminator is its own to consume. This keeps all lookahead state out of
//! the grammar: the lexer is advanced exactly once per token.

use crate::ast::{
    AndOrList, CommandList, ListItem, LogicalOp, OutputRedirect, Pipeline, Runnable, SimpleCommand,
};
use crate::lexer::Lexer;
use crate::parse_error::ParseError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Shell parser for one input line.
///
/// # Examples
///
/// ```
/// use minnow_shell::Parser;
///
/// let ast = Parser::parse("echo hello | tr a-z A-Z")?;
/// assert_eq!(ast.count_commands(), 2);
/// # Ok::<(), minnow_shell::ParseError>(())
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Parse one line into a command list.
    ///
    /// A blank line parses to an empty list. Errors carry the byte offset
    /// of the offending token.
    pub fn parse(input: &'a str) -> Result<CommandList, ParseError> {
        let mut parser = Parser {
            lexer: Lexer::new(input),
        };
        let (list, _eol) = parser.parse_command_list(false)?;
        Ok(list)
    }

    /// Parse chains until `Eol` (top level) or `)` (inside a subshell),
    /// returning the list and that terminator.
    ///
    /// `;` and `&` are the separators this level owns: `&` marks the chain
    /// it follows as background. Stray `;` between chains is skipped.
    fn parse_command_list(&mut self, in_subshell: bool) -> Result<(CommandList, Token), ParseError> {
        let mut items: Vec<ListItem> = Vec::new();

        loop {
            let token = self.next()?;
            match &token.kind {
                TokenKind::Semi => continue,
                TokenKind::Eol => {
                    if in_subshell {
                        return Err(unexpected(token, "')'"));
                    }
                    return Ok((finish_list(items, &token), token));
                }
                TokenKind::RParen if in_subshell => {
                    if items.is_empty() {
                        return Err(unexpected(token, "a command"));
                    }
                    return Ok((finish_list(items, &token), token));
                }
                _ => {}
            }

            let (chain, term) = self.parse_and_or(token)?;
            let span = chain.span;
            match term.kind {
                TokenKind::Semi => items.push(ListItem {
                    chain,
                    background: false,
                    span,
                }),
                TokenKind::Background => items.push(ListItem {
                    chain,
                    background: true,
                    span: span.merge(term.span),
                }),
                TokenKind::Eol => {
                    if in_subshell {
                        return Err(unexpected(term, "')'"));
                    }
                    items.push(ListItem {
                        chain,
                        background: false,
                        span,
                    });
                    return Ok((finish_list(items, &term), term));
                }
                TokenKind::RParen => {
                    if !in_subshell {
                        return Err(unexpected(term, "';', '&', or end of line"));
                    }
                    items.push(ListItem {
                        chain,
                        background: false,
                        span,
                    });
                    return Ok((finish_list(items, &term), term));
                }
                _ => return Err(unexpected(term, "';', '&', or end of line")),
            }
        }
    }

    /// `pipeline (('&&' | '||') pipeline)*`, left-associative.
    fn parse_and_or(&mut self, first_token: Token) -> Result<(AndOrList, Token), ParseError> {
        let (first, mut term) = self.parse_pipeline(first_token)?;
        let mut span = first.span;
        let mut rest = Vec::new();

        loop {
            let op = match term.kind {
                TokenKind::AndIf => LogicalOp::And,
                TokenKind::OrIf => LogicalOp::Or,
                _ => break,
            };
            let next = self.next()?;
            let (pipe, t) = self.parse_pipeline(next)?;
            span = span.merge(pipe.span);
            rest.push((op, pipe));
            term = t;
        }

        Ok((AndOrList { first, rest, span }, term))
    }

    /// Runnables joined by `|`, with redirections collected wherever they
    /// appear after the first runnable. Each direction may be set once.
    fn parse_pipeline(&mut self, first_token: Token) -> Result<(Pipeline, Token), ParseError> {
        let (first, mut term) = self.parse_runnable(first_token)?;
        let mut span = first.span();
        let mut runnables = vec![first];
        let mut stdin_redir: Option<String> = None;
        let mut stdout_redir: Option<OutputRedirect> = None;

        loop {
            match term.kind {
                TokenKind::Pipe => {
                    let next = self.next()?;
                    let (runnable, t) = self.parse_runnable(next)?;
                    span = span.merge(runnable.span());
                    runnables.push(runnable);
                    term = t;
                }
                TokenKind::In => {
                    if stdin_redir.is_some() {
                        return Err(ParseError::DuplicateRedirection {
                            direction: "input",
                            span: term.span,
                        });
                    }
                    let (path, target_span) = self.redirect_target()?;
                    span = span.merge(target_span);
                    stdin_redir = Some(path);
                    term = self.next()?;
                }
                TokenKind::Out | TokenKind::Append => {
                    if stdout_redir.is_some() {
                        return Err(ParseError::DuplicateRedirection {
                            direction: "output",
                            span: term.span,
                        });
                    }
                    let append = term.kind == TokenKind::Append;
                    let (path, target_span) = self.redirect_target()?;
                    span = span.merge(target_span);
                    stdout_redir = Some(if append {
                        OutputRedirect::Append(path)
                    } else {
                        OutputRedirect::Truncate(path)
                    });
                    term = self.next()?;
                }
                // A word can end up here after a closed subshell or a
                // redirection target; neither may be followed by more
                // arguments.
                TokenKind::Word(_) => {
                    return Err(unexpected(term, "an operator or end of command"));
                }
                _ => break,
            }
        }

        let mut pipeline = Pipeline {
            runnables,
            stdin_redir,
            stdout_redir,
            is_cd: false,
            span,
        };
        classify_cd(&mut pipeline)?;
        Ok((pipeline, term))
    }

    /// A command (word plus argument words) or a parenthesized subshell.
    fn parse_runnable(&mut self, first_token: Token) -> Result<(Runnable, Token), ParseError> {
        match first_token.kind {
            TokenKind::Word(name) => {
                let mut span = first_token.span;
                let mut args = Vec::new();
                loop {
                    let token = self.next()?;
                    match token.kind {
                        TokenKind::Word(arg) => {
                            span = span.merge(token.span);
                            args.push(arg);
                        }
                        _ => {
                            return Ok((
                                Runnable::Command(SimpleCommand { name, args, span }),
                                token,
                            ));
                        }
                    }
                }
            }
            TokenKind::LParen => {
                let open_span = first_token.span;
                let (mut inner, close) = self.parse_command_list(true)?;
                inner.span = open_span.merge(close.span);
                let term = self.next()?;
                Ok((Runnable::Subshell(Box::new(inner)), term))
            }
            _ => Err(unexpected(first_token, "a command")),
        }
    }

    /// The word naming a redirection's file.
    fn redirect_target(&mut self) -> Result<(String, Span), ParseError> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Word(path) => Ok((path, token.span)),
            _ => Err(unexpected(token, "a redirection target")),
        }
    }

    #[inline]
    fn next(&mut self) -> Result<Token, ParseError> {
        Ok(self.lexer.next_token()?)
    }
}

fn unexpected(token: Token, expected: &str) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.kind,
        expected: expected.to_string(),
        span: token.span,
    }
}

fn finish_list(items: Vec<ListItem>, terminator: &Token) -> CommandList {
    let span = match (items.first(), items.last()) {
        (Some(first), Some(last)) => first.span.merge(last.span),
        _ => Span::empty(terminator.span.start),
    };
    CommandList { items, span }
}

/// Mark a lone well-formed `cd` pipeline, and reject `cd` anywhere it
/// would have to run in a subprocess (where `chdir` could not affect the
/// shell).
fn classify_cd(pipe: &mut Pipeline) -> Result<(), ParseError> {
    let Some(cmd) = pipe
        .runnables
        .iter()
        .filter_map(Runnable::as_command)
        .find(|cmd| cmd.name == "cd")
    else {
        return Ok(());
    };

    if pipe.len() > 1 {
        return Err(ParseError::InvalidCd {
            context: "in a pipeline",
            span: cmd.span,
        });
    }
    if cmd.args.len() > 1 {
        return Err(ParseError::InvalidCd {
            context: "with more than one argument",
            span: cmd.span,
        });
    }
    if pipe.has_redirections() {
        return Err(ParseError::InvalidCd {
            context: "with redirections",
            span: cmd.span,
        });
    }

    pipe.is_cd = true;
    Ok(())
}

#[cfg(test)]
#[path = "parser_tests/mod.rs"]
mod tests;
