// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Textual forms of the AST: the indented tree print used by
//! `--print-ast`, and the canonical single-line rendering used by tests
//! and diagnostics.

use std::fmt;

use super::{AndOrList, CommandList, LogicalOp, OutputRedirect, Pipeline, Runnable};

/// Indentation step for the tree print.
const INDENT: &str = "  ";

impl fmt::Display for CommandList {
    /// Indented tree form.
    ///
    /// ```text
    /// cmd:echo, args:[hello]
    /// |
    /// cmd:tr, args:[a-z, A-Z]
    /// stdout -> out.txt
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, self, 0)
    }
}

fn pad(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, list: &CommandList, depth: usize) -> fmt::Result {
    for (i, item) in list.items.iter().enumerate() {
        write_and_or(f, &item.chain, depth)?;
        if item.background {
            pad(f, depth)?;
            writeln!(f, "&")?;
        } else if i + 1 < list.items.len() {
            pad(f, depth)?;
            writeln!(f, ";")?;
        }
    }
    Ok(())
}

fn write_and_or(f: &mut fmt::Formatter<'_>, chain: &AndOrList, depth: usize) -> fmt::Result {
    write_pipeline(f, &chain.first, depth)?;
    for (op, pipe) in &chain.rest {
        pad(f, depth)?;
        match op {
            LogicalOp::And => writeln!(f, "&&")?,
            LogicalOp::Or => writeln!(f, "||")?,
        }
        write_pipeline(f, pipe, depth)?;
    }
    Ok(())
}

fn write_pipeline(f: &mut fmt::Formatter<'_>, pipe: &Pipeline, depth: usize) -> fmt::Result {
    for (i, runnable) in pipe.runnables.iter().enumerate() {
        if i > 0 {
            pad(f, depth)?;
            writeln!(f, "|")?;
        }
        write_runnable(f, runnable, depth)?;
    }
    if let Some(path) = &pipe.stdin_redir {
        pad(f, depth)?;
        writeln!(f, "stdin -> {path}")?;
    }
    match &pipe.stdout_redir {
        Some(OutputRedirect::Truncate(path)) => {
            pad(f, depth)?;
            writeln!(f, "stdout -> {path}")?;
        }
        Some(OutputRedirect::Append(path)) => {
            pad(f, depth)?;
            writeln!(f, "stdout -> append to {path}")?;
        }
        None => {}
    }
    Ok(())
}

fn write_runnable(f: &mut fmt::Formatter<'_>, runnable: &Runnable, depth: usize) -> fmt::Result {
    match runnable {
        Runnable::Command(cmd) => {
            pad(f, depth)?;
            writeln!(f, "cmd:{}, args:[{}]", cmd.name, cmd.args.join(", "))
        }
        Runnable::Subshell(inner) => {
            pad(f, depth)?;
            writeln!(f, "(")?;
            write_list(f, inner, depth + 1)?;
            pad(f, depth)?;
            writeln!(f, ")")
        }
    }
}

/// Quote a word for re-lexing: unchanged when it contains no blank, quote,
/// escape, or operator byte; otherwise wrapped in double quotes with `"`
/// and `\` escaped.
pub fn quote_word(word: &str) -> String {
    let special = |c: char| {
        matches!(
            c,
            ' ' | '\t' | '\r' | '"' | '\\' | '<' | '>' | '|' | '&' | ';' | '(' | ')'
        )
    };
    if !word.is_empty() && !word.chars().any(special) {
        return word.to_string();
    }
    let mut out = String::with_capacity(word.len() + 2);
    out.push('"');
    for c in word.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

impl CommandList {
    /// Canonical single-line rendering, parseable back into an equivalent
    /// tree.
    pub fn to_command_line(&self) -> String {
        let mut parts = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            parts.push(render_and_or(&item.chain));
            if item.background {
                parts.push("&".to_string());
            } else if i + 1 < self.items.len() {
                parts.push(";".to_string());
            }
        }
        parts.join(" ")
    }
}

fn render_and_or(chain: &AndOrList) -> String {
    let mut out = render_pipeline(&chain.first);
    for (op, pipe) in &chain.rest {
        out.push_str(match op {
            LogicalOp::And => " && ",
            LogicalOp::Or => " || ",
        });
        out.push_str(&render_pipeline(pipe));
    }
    out
}

fn render_pipeline(pipe: &Pipeline) -> String {
    let mut out = pipe
        .runnables
        .iter()
        .map(render_runnable)
        .collect::<Vec<_>>()
        .join(" | ");
    if let Some(path) = &pipe.stdin_redir {
        out.push_str(" < ");
        out.push_str(&quote_word(path));
    }
    match &pipe.stdout_redir {
        Some(OutputRedirect::Truncate(path)) => {
            out.push_str(" > ");
            out.push_str(&quote_word(path));
        }
        Some(OutputRedirect::Append(path)) => {
            out.push_str(" >> ");
            out.push_str(&quote_word(path));
        }
        None => {}
    }
    out
}

fn render_runnable(runnable: &Runnable) -> String {
    match runnable {
        Runnable::Command(cmd) => std::iter::once(&cmd.name)
            .chain(cmd.args.iter())
            .map(|w| quote_word(w))
            .collect::<Vec<_>>()
            .join(" "),
        Runnable::Subshell(inner) => format!("( {} )", inner.to_command_line()),
    }
}

#[cfg(test)]
#[path = "print_tests.rs"]
mod tests;
