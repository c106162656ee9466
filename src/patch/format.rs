//! Serialize a `Patch` to the textual patch format.
//!
//! Each patch renders as a header plus one percent-encoded line per edit:
//!
//! ```text
//! @@ -382,8 +481,9 @@
//!  precon
//! -text
//! +next
//!  postcon
//! ```
//!
//! Header positions are 1-based; a span of 1 omits its length, a span of 0
//! keeps the raw 0-based position.

use std::fmt::{Display, Formatter, Result};

use super::Patch;
use crate::{utils::encode_uri, Diff};

fn coordinates(start: usize, length: usize) -> String {
    match length {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

impl Display for Patch {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(
            f,
            "@@ -{} +{} @@",
            coordinates(self.start1, self.length1),
            coordinates(self.start2, self.length2)
        )?;

        for diff in &self.diffs {
            let sign = match diff {
                Diff::Equal(_) => ' ',
                Diff::Delete(_) => '-',
                Diff::Insert(_) => '+',
            };
            writeln!(f, "{}{}", sign, encode_uri(diff.text()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_forms() {
        assert_eq!(coordinates(20, 0), "20,0");
        assert_eq!(coordinates(20, 1), "21");
        assert_eq!(coordinates(20, 18), "21,18");
    }

    #[test]
    fn display_encodes_bodies() {
        let patch = Patch {
            start1: 20,
            start2: 21,
            length1: 18,
            length2: 17,
            diffs: vec![
                Diff::equal("jump"),
                Diff::delete("s"),
                Diff::insert("ed"),
                Diff::equal(" over "),
                Diff::delete("the"),
                Diff::insert("a"),
                Diff::equal("\nlaz"),
            ],
        };
        assert_eq!(
            patch.to_string(),
            "@@ -21,18 +22,17 @@\n jump\n-s\n+ed\n  over \n-the\n+a\n %0Alaz\n"
        );
    }
}
