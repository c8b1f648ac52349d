//! Terminal output for the hero line.
//!
//! Interactive terminals get the line redrawn in place with a carriage
//! return and an erase-line sequence. Anything else (pipes, files) gets one
//! plain line per text change so the output stays readable as a log.

use std::io::{self, Write};
use std::time::Duration;

use super::HeroLine;

const CLEAR_LINE: &str = "\r\x1b[2K";
const HIGHLIGHT: &str = "\x1b[1;36m";
const RESET: &str = "\x1b[0m";

/// How the renderer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Redraw a single line in place, cursor included.
    Inline,
    /// Append one line per text change, no cursor.
    Line,
}

impl RenderMode {
    /// Inline for terminals, line mode otherwise.
    #[must_use]
    pub const fn detect(is_terminal: bool) -> Self {
        if is_terminal { Self::Inline } else { Self::Line }
    }
}

/// Writes a [`HeroLine`] to `W`.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
    mode: RenderMode,
    color: bool,
    last: Option<String>,
    dirty: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// `color` highlights the rotating text with ANSI bold cyan.
    pub const fn new(out: W, mode: RenderMode, color: bool) -> Self {
        Self {
            out,
            mode,
            color,
            last: None,
            dirty: false,
        }
    }

    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Draws `line` as it looks at `elapsed`.
    ///
    /// In line mode nothing is written unless the text changed since the last
    /// call.
    ///
    /// # Errors
    ///
    /// Returns the underlying write error.
    pub fn render(&mut self, line: &HeroLine, elapsed: Duration) -> io::Result<()> {
        match self.mode {
            RenderMode::Inline => {
                write!(self.out, "{CLEAR_LINE}{}", line.prefix())?;
                self.write_text(line.text())?;
                write!(self.out, "{}", line.cursor_cell(elapsed))?;
                self.dirty = true;
            }
            RenderMode::Line => {
                let plain = line.plain();
                if self.last.as_deref() == Some(plain.as_str()) {
                    return Ok(());
                }
                write!(self.out, "{}", line.prefix())?;
                self.write_text(line.text())?;
                writeln!(self.out)?;
                self.last = Some(plain);
            }
        }
        self.out.flush()
    }

    /// Leaves the terminal on a fresh line.
    ///
    /// # Errors
    ///
    /// Returns the underlying write error.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.dirty {
            writeln!(self.out)?;
            self.dirty = false;
        }
        self.out.flush()
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        if self.color {
            write!(self.out, "{HIGHLIGHT}{text}{RESET}")
        } else {
            write!(self.out, "{text}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::CursorBlink;

    fn line(text: &str) -> HeroLine {
        let mut l = HeroLine::new("A passionate ", Some(CursorBlink::default()));
        l.set_text(text);
        l
    }

    fn output(r: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn test_detect() {
        assert_eq!(RenderMode::detect(true), RenderMode::Inline);
        assert_eq!(RenderMode::detect(false), RenderMode::Line);
    }

    #[test]
    fn test_inline_redraws_in_place() {
        let mut r = TerminalRenderer::new(Vec::new(), RenderMode::Inline, false);
        r.render(&line("W"), Duration::from_millis(600)).unwrap();
        r.render(&line("We"), Duration::from_millis(100)).unwrap();
        r.finish().unwrap();
        assert_eq!(
            output(r),
            "\r\x1b[2KA passionate W|\r\x1b[2KA passionate We \n"
        );
    }

    #[test]
    fn test_line_mode_skips_unchanged_text() {
        let mut r = TerminalRenderer::new(Vec::new(), RenderMode::Line, false);
        r.render(&line("W"), Duration::ZERO).unwrap();
        r.render(&line("W"), Duration::from_millis(700)).unwrap();
        r.render(&line("We"), Duration::ZERO).unwrap();
        r.finish().unwrap();
        assert_eq!(output(r), "A passionate W\nA passionate We\n");
    }

    #[test]
    fn test_color_wraps_rotating_text_only() {
        let mut r = TerminalRenderer::new(Vec::new(), RenderMode::Line, true);
        r.render(&line("Web"), Duration::ZERO).unwrap();
        assert_eq!(output(r), "A passionate \x1b[1;36mWeb\x1b[0m\n");
    }

    #[test]
    fn test_finish_without_render_writes_nothing() {
        let mut r = TerminalRenderer::new(Vec::new(), RenderMode::Inline, false);
        r.finish().unwrap();
        assert!(output(r).is_empty());
    }
}
