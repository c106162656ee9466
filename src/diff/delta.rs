//! Compact delta serialization of an edit script.
//!
//! A delta is one line of tab-separated tokens: `=N` keeps `N` characters of
//! the source, `-N` drops `N` characters, and `+text` inserts
//! percent-encoded text. Paired with the source text it reproduces the full
//! script.

use super::Diff;
use crate::{
    utils::{decode_uri, encode_uri},
    Error,
};

/// Encode `diffs` as a delta, crushing equalities and deletions down to
/// character counts.
pub fn diff_to_delta(diffs: &[Diff]) -> String {
    let tokens: Vec<String> = diffs
        .iter()
        .map(|diff| match diff {
            Diff::Insert(text) => format!("+{}", encode_uri(text)),
            Diff::Delete(_) => format!("-{}", diff.char_len()),
            Diff::Equal(_) => format!("={}", diff.char_len()),
        })
        .collect();
    tokens.join("\t")
}

/// Rehydrate the script that `delta` describes against its source `text1`.
pub fn diff_from_delta(text1: &str, delta: &str) -> Result<Vec<Diff>, Error> {
    let chars: Vec<char> = text1.chars().collect();
    let mut diffs = Vec::new();
    // Cursor into `chars`.
    let mut pointer = 0;

    for token in delta.split('\t') {
        if token.is_empty() {
            // Blank tokens are ok (from a trailing \t).
            continue;
        }
        let op = match token.chars().next() {
            Some(op) => op,
            None => continue,
        };
        let param = &token[op.len_utf8()..];
        match op {
            '+' => diffs.push(Diff::Insert(decode_uri(param)?)),
            '-' | '=' => {
                let count: usize = param
                    .parse()
                    .map_err(|_| Error::InvalidDelta(token.to_owned()))?;
                let end = pointer + count;
                if end > chars.len() {
                    return Err(Error::DeltaLengthMismatch {
                        consumed: end,
                        expected: chars.len(),
                    });
                }
                let text: String = chars[pointer..end].iter().collect();
                pointer = end;
                if op == '=' {
                    diffs.push(Diff::Equal(text));
                } else {
                    diffs.push(Diff::Delete(text));
                }
            }
            _ => return Err(Error::InvalidOp(op)),
        }
    }

    if pointer != chars.len() {
        return Err(Error::DeltaLengthMismatch {
            consumed: pointer,
            expected: chars.len(),
        });
    }
    Ok(diffs)
}
