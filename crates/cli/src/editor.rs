// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw-terminal line editor.
//!
//! Canonical mode, echo, extended input processing, and signal generation
//! are all disabled while a line is being read (`VMIN = 1`, `VTIME = 0`),
//! so every byte arrives immediately and the editor does its own echoing.
//! The saved termios is restored on every return path by a drop guard.
//!
//! Bindings: printable bytes insert at the cursor, Backspace/DEL erase,
//! Ctrl-W erases a word, left/right arrows move, Tab completes, Ctrl-D on
//! an empty line is end of input, Enter submits.

use std::io::{self, Write};

use nix::errno::Errno;
use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};

use crate::complete::{self, Completion};
use crate::linebuf::LineBuffer;
use crate::reader::{LineSource, ReadLine, LINE_LIMIT};

const CTRL_D: u8 = 0x04;
const CTRL_W: u8 = 0x17;
const BACKSPACE: u8 = 0x08;
const DEL: u8 = 0x7f;
const ESC: u8 = 0x1b;

/// Completion candidates shown per line.
const ITEMS_PER_LINE: usize = 6;

/// Puts the terminal into raw mode, restoring the original settings when
/// dropped, whatever path the read takes out.
struct RawModeGuard {
    saved: Termios,
}

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        let saved = termios::tcgetattr(libc::STDIN_FILENO).map_err(to_io)?;
        let mut raw = saved.clone();
        raw.local_flags.remove(
            LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::IEXTEN | LocalFlags::ISIG,
        );
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        termios::tcsetattr(libc::STDIN_FILENO, SetArg::TCSANOW, &raw).map_err(to_io)?;
        Ok(Self { saved })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = termios::tcsetattr(libc::STDIN_FILENO, SetArg::TCSANOW, &self.saved);
    }
}

fn to_io(err: Errno) -> io::Error {
    io::Error::from_raw_os_error(err as i32)
}

/// Arrow keys arrive as `ESC [ C` / `ESC [ D`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum EscState {
    Idle,
    SawEsc,
    SawBracket,
}

/// Interactive line source over the raw terminal.
pub struct Editor {
    prompt: String,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
        }
    }

    fn read_raw_line(&mut self) -> io::Result<ReadLine> {
        let _guard = RawModeGuard::enter()?;
        let mut out = io::stdout();
        write_all_flush(&mut out, self.prompt.as_bytes())?;

        let mut buf = LineBuffer::new(LINE_LIMIT);
        let mut esc = EscState::Idle;
        let mut byte = [0u8; 1];

        loop {
            match nix::unistd::read(libc::STDIN_FILENO, &mut byte) {
                Ok(0) => {
                    write_all_flush(&mut out, b"\n")?;
                    return Ok(ReadLine::Eof);
                }
                Ok(_) => {}
                Err(Errno::EINTR) => continue,
                Err(err) => return Err(to_io(err)),
            }
            let c = byte[0];

            // Finish a pending arrow sequence before anything else.
            match (esc, c) {
                (EscState::SawEsc, b'[') => {
                    esc = EscState::SawBracket;
                    continue;
                }
                (EscState::SawBracket, b'D') => {
                    esc = EscState::Idle;
                    if buf.move_left() {
                        write_all_flush(&mut out, b"\x08")?;
                    }
                    continue;
                }
                (EscState::SawBracket, b'C') => {
                    esc = EscState::Idle;
                    if let Some(stepped) = buf.move_right() {
                        write_all_flush(&mut out, &[stepped])?;
                    }
                    continue;
                }
                (EscState::Idle, ESC) => {
                    esc = EscState::SawEsc;
                    continue;
                }
                // Not an arrow after all; fall through and handle `c`.
                (_, _) => esc = EscState::Idle,
            }

            match c {
                b'\n' | b'\r' => {
                    write_all_flush(&mut out, b"\n")?;
                    return Ok(ReadLine::Line(buf.into_string()));
                }
                CTRL_D => {
                    if buf.is_empty() {
                        write_all_flush(&mut out, b"\n")?;
                        return Ok(ReadLine::Eof);
                    }
                }
                BACKSPACE | DEL => {
                    if buf.backspace() {
                        out.write_all(b"\x08")?;
                        redraw_tail(&mut out, &buf, 1)?;
                    }
                }
                CTRL_W => {
                    let removed = buf.erase_word();
                    if removed > 0 {
                        for _ in 0..removed {
                            out.write_all(b"\x08")?;
                        }
                        redraw_tail(&mut out, &buf, removed)?;
                    }
                }
                b'\t' => self.autocomplete(&mut out, &mut buf)?,
                c if is_printable(c) => {
                    if buf.insert(c) {
                        out.write_all(&[c])?;
                        redraw_tail(&mut out, &buf, 0)?;
                    }
                }
                _ => {}
            }
        }
    }

    /// Complete the word at the cursor, echoing whatever changed.
    fn autocomplete(&self, out: &mut io::Stdout, buf: &mut LineBuffer) -> io::Result<()> {
        match complete::query(buf) {
            None => Ok(()),
            Some(Completion::Single(suffix)) => {
                if buf.insert_slice(suffix.as_bytes()) {
                    out.write_all(suffix.as_bytes())?;
                    redraw_tail(out, buf, 0)?;
                }
                Ok(())
            }
            Some(Completion::Multiple(items)) => {
                // Step past the current line, list candidates, reprint.
                out.write_all(buf.tail())?;
                out.write_all(b"\n")?;
                for chunk in items.chunks(ITEMS_PER_LINE) {
                    for item in chunk {
                        out.write_all(item.as_bytes())?;
                        out.write_all(b" ")?;
                    }
                    out.write_all(b"\n")?;
                }
                self.reprint(out, buf)
            }
            Some(Completion::TooMany) => {
                out.write_all(buf.tail())?;
                out.write_all(b"\nToo many options\n")?;
                self.reprint(out, buf)
            }
        }
    }

    /// Prompt and buffer again, cursor restored to its column.
    fn reprint(&self, out: &mut io::Stdout, buf: &LineBuffer) -> io::Result<()> {
        out.write_all(self.prompt.as_bytes())?;
        out.write_all(buf.as_bytes())?;
        for _ in 0..buf.len() - buf.cursor() {
            out.write_all(b"\x08")?;
        }
        out.flush()
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine> {
        self.prompt = prompt.to_string();
        self.read_raw_line()
    }
}

fn is_printable(byte: u8) -> bool {
    (0x20..0x7f).contains(&byte) || byte >= 0x80
}

fn write_all_flush(out: &mut io::Stdout, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.flush()
}

/// Rewrite the text after the cursor in place, clearing `cleared` stale
/// columns, and park the cursor back where it was.
fn redraw_tail(out: &mut io::Stdout, buf: &LineBuffer, cleared: usize) -> io::Result<()> {
    let tail = buf.tail();
    if !tail.is_empty() || cleared > 0 {
        out.write_all(tail)?;
        for _ in 0..cleared {
            out.write_all(b" ")?;
        }
        for _ in 0..tail.len() + cleared {
            out.write_all(b"\x08")?;
        }
    }
    out.flush()
}
