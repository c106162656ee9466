//! Render an edit script for a terminal.

use ansi_term::{Color, Style};
use std::fmt::{Display, Formatter, Result};

use crate::Diff;

/// Struct used to adjust the formatting of an edit script
///
/// Deletions and insertions are rendered inline, in the order they appear in
/// the script. With color enabled, deletions are struck through in red and
/// insertions are green.
#[derive(Debug)]
pub struct DiffFormatter {
    with_color: bool,

    equal: Style,
    delete: Style,
    insert: Style,
}

impl DiffFormatter {
    /// Construct a new formatter
    pub fn new() -> Self {
        Self {
            with_color: false,

            equal: Style::new(),
            delete: Color::Red.strikethrough(),
            insert: Color::Green.normal(),
        }
    }

    /// Enable formatting with color
    pub fn with_color(mut self) -> Self {
        self.with_color = true;
        self
    }

    /// Returns a `Display` impl which can be used to print an edit script
    pub fn fmt_diffs<'a>(&'a self, diffs: &'a [Diff]) -> impl Display + 'a {
        DiffsDisplay { f: self, diffs }
    }
}

impl Default for DiffFormatter {
    fn default() -> Self {
        Self::new()
    }
}

struct DiffsDisplay<'a> {
    f: &'a DiffFormatter,
    diffs: &'a [Diff],
}

impl Display for DiffsDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for diff in self.diffs {
            let style = match diff {
                Diff::Equal(_) => self.f.equal,
                Diff::Delete(_) => self.f.delete,
                Diff::Insert(_) => self.f.insert,
            };

            if self.f.with_color {
                write!(f, "{}", style.prefix())?;
            }
            write!(f, "{}", diff.text())?;
            if self.f.with_color {
                write!(f, "{}", style.suffix())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_concatenates_script() {
        let diffs = vec![
            Diff::equal("jump"),
            Diff::delete("s"),
            Diff::insert("ed"),
            Diff::equal(" over"),
        ];
        let f = DiffFormatter::new();
        assert_eq!(f.fmt_diffs(&diffs).to_string(), "jumpsed over");
    }

    #[test]
    fn colored_output_wraps_edits() {
        let diffs = vec![Diff::delete("s"), Diff::insert("ed")];
        let f = DiffFormatter::new().with_color();
        let rendered = f.fmt_diffs(&diffs).to_string();
        assert!(rendered.contains('\u{1b}'));
        assert!(rendered.contains('s'));
        assert!(rendered.contains("ed"));
    }
}
