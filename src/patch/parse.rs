//! Parse the textual patch format.

use super::Patch;
use crate::{utils::decode_uri, Diff, Error};

/// Parse a concatenation of patch blocks.
pub(crate) fn parse(input: &str) -> Result<Vec<Patch>, Error> {
    let mut patches = Vec::new();
    if input.is_empty() {
        return Ok(patches);
    }

    let mut lines = input.split('\n').peekable();
    while let Some(&line) = lines.peek() {
        if line.is_empty() {
            // Blank line between blocks.
            lines.next();
            continue;
        }

        let mut patch = parse_header(line)?;
        lines.next();

        // Body lines up to the next header.
        while let Some(&line) = lines.peek() {
            let sign = match line.chars().next() {
                // Blank line?  Whatever.
                None => {
                    lines.next();
                    continue;
                }
                Some(sign) => sign,
            };
            if sign == '@' {
                // Start of next patch.
                break;
            }
            let body = decode_uri(&line[sign.len_utf8()..])?;
            match sign {
                ' ' => patch.diffs.push(Diff::Equal(body)),
                '-' => patch.diffs.push(Diff::Delete(body)),
                '+' => patch.diffs.push(Diff::Insert(body)),
                _ => return Err(Error::InvalidOp(sign)),
            }
            lines.next();
        }

        patches.push(patch);
    }
    Ok(patches)
}

/// Parse `@@ -A[,B] +C[,D] @@` into an empty patch carrying the positions.
fn parse_header(line: &str) -> Result<Patch, Error> {
    let header = || Error::InvalidPatchHeader(line.to_owned());

    let ranges = line
        .strip_prefix("@@ -")
        .and_then(|rest| rest.strip_suffix(" @@"))
        .ok_or_else(header)?;
    let (range1, range2) = ranges.split_once(" +").ok_or_else(header)?;

    let (start1, length1) = parse_range(range1).ok_or_else(header)?;
    let (start2, length2) = parse_range(range2).ok_or_else(header)?;

    let mut patch = Patch {
        start1,
        start2,
        length1: 1,
        length2: 1,
        ..Patch::default()
    };

    // A missing length means a span of 1 and a 1-based position; a zero
    // length keeps the raw position.
    match length1 {
        None => patch.start1 = start1.checked_sub(1).ok_or_else(header)?,
        Some(0) => patch.length1 = 0,
        Some(length) => {
            patch.start1 = start1.checked_sub(1).ok_or_else(header)?;
            patch.length1 = length;
        }
    }
    match length2 {
        None => patch.start2 = start2.checked_sub(1).ok_or_else(header)?,
        Some(0) => patch.length2 = 0,
        Some(length) => {
            patch.start2 = start2.checked_sub(1).ok_or_else(header)?;
            patch.length2 = length;
        }
    }

    Ok(patch)
}

/// Parse `A` or `A,B`; an empty `B` counts as missing.
fn parse_range(range: &str) -> Option<(usize, Option<usize>)> {
    match range.split_once(',') {
        None => Some((parse_number(range)?, None)),
        Some((start, "")) => Some((parse_number(start)?, None)),
        Some((start, length)) => Some((parse_number(start)?, Some(parse_number(length)?))),
    }
}

/// Strict unsigned decimal: digits only, no sign, no whitespace.
fn parse_number(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_forms() {
        let patch = parse_header("@@ -21,18 +22,17 @@").unwrap();
        assert_eq!(
            (patch.start1, patch.length1, patch.start2, patch.length2),
            (20, 18, 21, 17)
        );

        // Omitted length means 1.
        let patch = parse_header("@@ -21 +22 @@").unwrap();
        assert_eq!(
            (patch.start1, patch.length1, patch.start2, patch.length2),
            (20, 1, 21, 1)
        );

        // A zero length keeps the raw position.
        let patch = parse_header("@@ -3,0 +10,4 @@").unwrap();
        assert_eq!(
            (patch.start1, patch.length1, patch.start2, patch.length2),
            (3, 0, 9, 4)
        );
    }

    #[test]
    fn header_rejects_garbage() {
        assert!(parse_header("@@ _0,0 +0,0 @@").is_err());
        assert!(parse_header("@@ -1,2 +3,4").is_err());
        assert!(parse_header("@@ -1,2 @@").is_err());
        assert!(parse_header("Bad\nPatch\n").is_err());
        assert!(parse_header("@@ -a,2 +3,4 @@").is_err());
        assert!(parse_header("@@ --1,2 +3,4 @@").is_err());
    }

    #[test]
    fn body_rejects_unknown_ops() {
        let text = "@@ -1,3 +1,3 @@\n*abc\n";
        assert_eq!(parse(text), Err(Error::InvalidOp('*')));
    }

    #[test]
    fn body_rejects_bad_escapes() {
        let text = "@@ -1,3 +1,3 @@\n+ab%xy\n";
        assert!(matches!(parse(text), Err(Error::IllegalEscape(_))));
    }
}
