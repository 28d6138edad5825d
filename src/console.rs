//! The text mirror of everything the dialog says.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

/// Echoes spoken lines to a text stream, optionally in a highlight color.
///
/// The highlight sticks: once set, every following line is written in that color until it is
/// changed or cleared.
pub struct Console<W: Write> {
    out: W,
    highlight: Option<Color>,
}

impl<W: Write> Console<W> {
    #[allow(missing_docs)]
    pub fn new(out: W) -> Self {
        Self {
            out,
            highlight: None,
        }
    }

    /// Sets the color of all subsequent lines. `None` restores the terminal's default.
    pub fn set_highlight(&mut self, highlight: Option<Color>) {
        self.highlight = highlight;
    }

    #[allow(missing_docs)]
    pub fn highlight(&self) -> Option<Color> {
        self.highlight
    }

    /// Writes the line, verbatim, followed by a newline.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.highlight {
            Some(color) => {
                queue!(self.out, SetForegroundColor(color), Print(line), ResetColor, Print("\n"))?
            }
            None => writeln!(self.out, "{}", line)?,
        }
        self.out.flush()
    }

    /// Consumes the console and returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Console<io::Stdout> {
    /// A console that writes to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_verbatim() {
        let mut console = Console::new(Vec::new());
        console.write_line("I'm listening...").unwrap();
        assert_eq!(b"I'm listening...\n".to_vec(), console.into_inner());
    }

    #[test]
    fn highlight_wraps_line_in_color_codes() {
        let mut console = Console::new(Vec::new());
        console.set_highlight(Some(Color::Green));
        console.write_line("Green is my favorite too!").unwrap();
        console.write_line("What is your name?").unwrap();

        let output = String::from_utf8(console.into_inner()).unwrap();
        assert!(output.contains("Green is my favorite too!"));
        assert!(output.contains("What is your name?"));
        assert!(output.contains("\u{1b}["));
        assert!(output.ends_with('\n'));
    }
}
