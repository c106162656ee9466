//! Line-mode speedup: diff whole lines first, then refine.
//!
//! Each distinct line is assigned a single character of a private alphabet,
//! the encoded strings are diffed cheaply, and the coarse line-level script
//! is re-diffed character by character where deletions and insertions meet.

use std::{collections::HashMap, time::Instant};

use tracing::debug;

use super::Diff;
#[cfg(test)]
use super::text_of;
use crate::DiffMatchPatch;

/// Cap on distinct lines while encoding the first text; the remainder is
/// swallowed as one line. Leaves headroom for the second text's lines.
const MAX_LINES_1: usize = 40_000;
/// Cap on distinct lines over both texts.
const MAX_LINES_2: usize = 65_535;

pub(crate) struct LineEncoding<'a> {
    pub chars1: Vec<char>,
    pub chars2: Vec<char>,
    pub line_array: Vec<&'a [char]>,
}

/// The alphabet character for line index `i`, skipping the surrogate gap so
/// every index maps to a valid scalar value.
fn line_char(index: usize) -> char {
    let code = if index < 0xD800 { index } else { index + 0x800 };
    char::from_u32(code as u32).expect("line index maps to a scalar value")
}

/// Encode each line of `text` as one character of the shared alphabet.
fn lines_to_chars_munge<'a>(
    text: &'a [char],
    line_array: &mut Vec<&'a [char]>,
    line_hash: &mut HashMap<&'a [char], usize>,
    max_lines: usize,
) -> Vec<char> {
    let mut chars = Vec::new();
    let mut line_start = 0;
    while line_start < text.len() {
        // Keep the newline on the line; the last line may lack one.
        let mut line_end = match text[line_start..].iter().position(|&c| c == '\n') {
            Some(i) => line_start + i + 1,
            None => text.len(),
        };
        if line_array.len() == max_lines {
            // Alphabet exhausted; swallow the rest of the text as one line.
            line_end = text.len();
        }
        let line = &text[line_start..line_end];
        let index = match line_hash.get(line) {
            Some(&index) => index,
            None => {
                line_array.push(line);
                let index = line_array.len() - 1;
                line_hash.insert(line, index);
                index
            }
        };
        chars.push(line_char(index));
        line_start = line_end;
    }
    chars
}

/// Split both texts into lines and encode them over a shared alphabet.
///
/// Index 0 of the line array is a sentinel empty line, so real lines start
/// at code point 1.
pub(crate) fn lines_to_chars<'a>(text1: &'a [char], text2: &'a [char]) -> LineEncoding<'a> {
    let mut line_array: Vec<&[char]> = vec![&[]];
    let mut line_hash = HashMap::new();

    let chars1 = lines_to_chars_munge(text1, &mut line_array, &mut line_hash, MAX_LINES_1);
    let chars2 = lines_to_chars_munge(text2, &mut line_array, &mut line_hash, MAX_LINES_2);

    LineEncoding {
        chars1,
        chars2,
        line_array,
    }
}

/// Expand an encoded script back into line text using the shared alphabet.
pub(crate) fn chars_to_lines(diffs: &mut [Diff], line_array: &[&[char]]) {
    for diff in diffs.iter_mut() {
        let mut text = String::new();
        for c in diff.text().chars() {
            let code = c as usize;
            let index = if code < 0xD800 { code } else { code - 0x800 };
            text.extend(line_array[index].iter());
        }
        *diff = diff.with_text(text);
    }
}

impl DiffMatchPatch {
    /// Diff two large texts line by line, then re-diff the replacement
    /// blocks character by character.
    pub(crate) fn diff_line_mode(
        &self,
        text1: &[char],
        text2: &[char],
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        let encoding = lines_to_chars(text1, text2);
        debug!(
            lines = encoding.line_array.len() - 1,
            "line-mode diff engaged"
        );

        let mut diffs = self.diff_internal(&encoding.chars1, &encoding.chars2, false, deadline);
        chars_to_lines(&mut diffs, &encoding.line_array);

        // Eliminate freak equalities the coarse pass may have produced.
        self.diff_cleanup_semantic(&mut diffs);

        // Re-diff each replacement block character by character.
        diffs.push(Diff::equal(""));
        let mut pointer = 0;
        let mut count_delete = 0;
        let mut count_insert = 0;
        let mut text_delete = String::new();
        let mut text_insert = String::new();
        while pointer < diffs.len() {
            match &diffs[pointer] {
                Diff::Insert(text) => {
                    count_insert += 1;
                    text_insert.push_str(text);
                }
                Diff::Delete(text) => {
                    count_delete += 1;
                    text_delete.push_str(text);
                }
                Diff::Equal(_) => {
                    if count_delete >= 1 && count_insert >= 1 {
                        let deleted: Vec<char> = text_delete.chars().collect();
                        let inserted: Vec<char> = text_insert.chars().collect();
                        let sub_diffs = self.diff_internal(&deleted, &inserted, false, deadline);
                        let start = pointer - count_delete - count_insert;
                        let new_len = sub_diffs.len();
                        diffs.splice(start..pointer, sub_diffs);
                        pointer = start + new_len;
                    }
                    count_delete = 0;
                    count_insert = 0;
                    text_delete.clear();
                    text_insert.clear();
                }
            }
            pointer += 1;
        }
        diffs.pop();
        diffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn encode_shared_alphabet() {
        let text1 = chars("alpha\nbeta\nalpha\n");
        let text2 = chars("beta\nalpha\nbeta\n");
        let encoding = lines_to_chars(&text1, &text2);
        assert_eq!(encoding.chars1, chars("\u{1}\u{2}\u{1}"));
        assert_eq!(encoding.chars2, chars("\u{2}\u{1}\u{2}"));
        assert_eq!(
            encoding.line_array,
            vec![&chars("")[..], &chars("alpha\n")[..], &chars("beta\n")[..]]
        );
    }

    #[test]
    fn encode_without_trailing_newline() {
        let text1 = chars("");
        let text2 = chars("alpha\r\nbeta\r\n\r\n\r\n");
        let encoding = lines_to_chars(&text1, &text2);
        assert_eq!(encoding.chars1, Vec::<char>::new());
        assert_eq!(encoding.chars2, chars("\u{1}\u{2}\u{3}\u{3}"));
        assert_eq!(
            encoding.line_array,
            vec![
                &chars("")[..],
                &chars("alpha\r\n")[..],
                &chars("beta\r\n")[..],
                &chars("\r\n")[..],
            ]
        );

        let text1 = chars("a");
        let text2 = chars("b");
        let encoding = lines_to_chars(&text1, &text2);
        assert_eq!(encoding.chars1, chars("\u{1}"));
        assert_eq!(encoding.chars2, chars("\u{2}"));
    }

    #[test]
    fn decode_expands_lines() {
        let empty = chars("");
        let alpha = chars("alpha\n");
        let beta = chars("beta\n");
        let line_array = [&empty[..], &alpha[..], &beta[..]];
        let mut diffs = vec![
            Diff::equal("\u{1}\u{2}\u{1}"),
            Diff::insert("\u{2}\u{1}\u{2}"),
        ];
        chars_to_lines(&mut diffs, &line_array);
        assert_eq!(
            diffs,
            vec![
                Diff::equal("alpha\nbeta\nalpha\n"),
                Diff::insert("beta\nalpha\nbeta\n"),
            ]
        );
    }

    #[test]
    fn alphabet_skips_surrogates() {
        assert_eq!(line_char(1), '\u{1}');
        assert_eq!(line_char(0xD7FF), '\u{D7FF}');
        assert_eq!(line_char(0xD800), '\u{E000}');

        // Round-trips through the decode arithmetic in chars_to_lines.
        for index in [1usize, 300, 0xD7FF, 0xD800, 0xFFFF] {
            let c = line_char(index);
            let code = c as usize;
            let back = if code < 0xD800 { code } else { code - 0x800 };
            assert_eq!(back, index);
        }
    }

    #[test]
    fn encode_many_lines() {
        // More lines than fit in one byte, to exercise wide alphabet codes.
        let n = 300;
        let mut text = String::new();
        for i in 0..n {
            text.push_str(&format!("line {}\n", i));
        }
        let text: Vec<char> = text.chars().collect();
        let encoding = lines_to_chars(&text, &[]);
        assert_eq!(encoding.chars1.len(), n);
        assert_eq!(encoding.line_array.len(), n + 1);

        let mut diffs = vec![Diff::delete(text_of(&encoding.chars1))];
        chars_to_lines(&mut diffs, &encoding.line_array);
        assert_eq!(diffs[0].text(), text_of(&text));
    }
}
