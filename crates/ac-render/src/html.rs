use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use ac_core::frame::CharGrid;
use ac_core::traits::AsciiOutput;
use anyhow::{Context, Result};

/// Écrit la grille dans un document HTML autonome à police fixe.
///
/// # Example
/// ```
/// use ac_render::html::render_html;
/// use ac_core::frame::CharGrid;
/// let mut grid = CharGrid::new(1, 1);
/// grid.set(0, 0, '<');
/// let doc = render_html(&grid, "Courier New");
/// assert!(doc.contains("&lt;"));
/// assert!(doc.contains("font-family: 'Courier New'"));
/// ```
pub struct HtmlOutput {
    path: PathBuf,
    font: String,
}

impl HtmlOutput {
    /// Sink writing to `path` with `font` as the page font.
    pub fn new(path: impl Into<PathBuf>, font: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            font: font.into(),
        }
    }

    /// Destination file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsciiOutput for HtmlOutput {
    fn out(&mut self, grid: &CharGrid) -> Result<()> {
        let doc = render_html(grid, &self.font);
        std::fs::write(&self.path, doc)
            .with_context(|| format!("Impossible d'écrire {}", self.path.display()))?;
        log::info!("HTML écrit : {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

/// Document HTML complet pour `grid`.
#[must_use]
pub fn render_html(grid: &CharGrid, font: &str) -> String {
    let mut doc = String::with_capacity(256 + grid.width() * grid.height() * 2);
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str("<title>tilescii</title>\n</head>\n");
    let _ = writeln!(
        doc,
        "<body style=\"margin: 0; background: #fff;\">\n<pre style=\"font-family: '{}'; font-size: 8px; line-height: 1; letter-spacing: 0.2em;\">",
        escape(font)
    );
    for row in grid.rows() {
        for &c in row {
            push_escaped(&mut doc, c);
        }
        doc.push('\n');
    }
    doc.push_str("</pre>\n</body>\n</html>\n");
    doc
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        let grid = CharGrid::from_cells(5, 1, "<&>\"'".chars().collect()).unwrap();
        let doc = render_html(&grid, "Courier New");
        assert!(doc.contains("&lt;&amp;&gt;&quot;&#39;\n</pre>"));
    }

    #[test]
    fn rows_are_separate_lines() {
        let grid = CharGrid::from_cells(2, 2, "12ab".chars().collect()).unwrap();
        let doc = render_html(&grid, "Courier New");
        assert!(doc.contains("12\nab\n"));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let mut sink = HtmlOutput::new(&path, "Monaco");
        let grid = CharGrid::from_cells(1, 1, vec!['#']).unwrap();
        sink.out(&grid).unwrap();
        let doc = std::fs::read_to_string(&path).unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("'Monaco'"));
        assert!(doc.contains("#\n"));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = HtmlOutput::new(dir.path().join("missing/dir/out.html"), "Monaco");
        assert!(sink.out(&CharGrid::new(1, 1)).is_err());
    }
}
