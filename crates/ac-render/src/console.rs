use std::io::{self, Stdout, Write};

use ac_core::frame::CharGrid;
use ac_core::traits::AsciiOutput;
use anyhow::{Context, Result};

/// Écrit la grille ligne par ligne sur un flux texte.
///
/// # Example
/// ```
/// use ac_core::frame::CharGrid;
/// use ac_core::traits::AsciiOutput;
/// use ac_render::console::ConsoleOutput;
///
/// let mut grid = CharGrid::new(2, 1);
/// grid.set(0, 0, '#');
/// let mut out = ConsoleOutput::new(Vec::new());
/// out.out(&grid).unwrap();
/// assert_eq!(out.into_inner(), b"# \n");
/// ```
pub struct ConsoleOutput<W = Stdout> {
    writer: W,
}

impl ConsoleOutput<Stdout> {
    /// Sink on the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleOutput<W> {
    /// Sink on an arbitrary writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AsciiOutput for ConsoleOutput<W> {
    fn out(&mut self, grid: &CharGrid) -> Result<()> {
        for line in grid.lines() {
            writeln!(self.writer, "{line}").context("Écriture console impossible")?;
        }
        self.writer.flush().context("Écriture console impossible")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_row() {
        let grid = CharGrid::from_cells(3, 2, "abcdef".chars().collect()).unwrap();
        let mut out = ConsoleOutput::new(Vec::new());
        out.out(&grid).unwrap();
        assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "abc\ndef\n");
    }

    #[test]
    fn empty_grid_writes_nothing() {
        let mut out = ConsoleOutput::new(Vec::new());
        out.out(&CharGrid::new(0, 0)).unwrap();
        assert!(out.into_inner().is_empty());
    }
}
