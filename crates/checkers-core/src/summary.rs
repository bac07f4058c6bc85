//! Terminal summary output

use std::io::{self, Write};

use console::{Style, Term};

use crate::tool::{Markup, Tool};

/// Width used when the output is not a terminal
pub const DEFAULT_WIDTH: usize = 80;

/// Writes separator lines and raw text to a terminal or any writer
pub struct TerminalWriter<W: Write> {
    out: W,
    width: usize,
    styled: bool,
}

impl TerminalWriter<io::Stdout> {
    /// Writer for the process's stdout, sized to the attached terminal
    pub fn stdout() -> Self {
        let term = Term::stdout();
        let width = if term.is_term() {
            term.size().1 as usize
        } else {
            DEFAULT_WIDTH
        };
        Self::new(io::stdout(), width, console::colors_enabled())
    }
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(out: W, width: usize, styled: bool) -> Self {
        Self { out, width, styled }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn style(&self, markup: Option<Markup>) -> Style {
        markup
            .map(|m| m.style())
            .unwrap_or_else(Style::new)
            .force_styling(self.styled)
    }

    /// Write `=== title ===` filling the writer width
    pub fn write_sep(&mut self, sep: &str, title: &str, markup: Option<Markup>) -> io::Result<()> {
        let line = separator_line(sep, title, self.width);
        let styled = self.style(markup).apply_to(line);
        writeln!(self.out, "{}", styled)
    }

    /// Write text verbatim
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    /// Write a single styled line
    pub fn line(&mut self, text: &str, markup: Option<Markup>) -> io::Result<()> {
        let styled = self.style(markup).apply_to(text);
        writeln!(self.out, "{}", styled)
    }
}

/// Build a separator line of `width` columns with `title` centred.
///
/// At least one separator is placed on each side even if the title is wider
/// than the line.
pub fn separator_line(sep: &str, title: &str, width: usize) -> String {
    if sep.is_empty() {
        return format!(" {} ", title);
    }

    let sep_len = sep.chars().count();
    let title_len = title.chars().count();
    let repeats = (width.saturating_sub(title_len + 2) / (2 * sep_len)).max(1);
    let fill = sep.repeat(repeats);
    let mut line = format!("{} {} {}", fill, title, fill);

    let trailing = sep.trim_end();
    if line.chars().count() + trailing.chars().count() <= width {
        line.push_str(trailing);
    }
    line
}

/// Print one tool's section: a coloured header, then its output
pub fn present<W: Write>(
    writer: &mut TerminalWriter<W>,
    tool: Tool,
    markup: Markup,
    text: &str,
) -> io::Result<()> {
    writer.write_sep("=", &format!("tests {}", tool.name()), Some(markup))?;
    writer.write(text)
}
