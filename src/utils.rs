//! Common string primitives shared by the diff, match, and patch engines.
//!
//! The engines operate on `&[char]` so that every position and length is a
//! count of Unicode scalar values. The `*_bytes` variants work on `&str` and
//! return byte lengths that are always char-boundary aligned; the cleanup
//! passes use them to split and splice `String` texts in place.

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::Error;

/// Characters left literal by the delta and patch text encodings, mirroring
/// `encodeURI`. Space stays literal so encoded bodies never contain `%20`.
const KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'?')
    .remove(b'@')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `text` for a delta token or patch body line.
pub(crate) fn encode_uri(text: &str) -> String {
    percent_encode(text.as_bytes(), KEEP).to_string()
}

/// Decode a percent-encoded delta token or patch body line.
///
/// Decoding is strict: every `%` must begin a two-hex-digit escape and the
/// decoded byte sequence must be valid UTF-8. Literal spaces are accepted
/// alongside `%20`.
pub(crate) fn decode_uri(text: &str) -> Result<String, Error> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while let Some(&b) = bytes.get(i) {
        if b == b'%' {
            let valid = matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(h), Some(l)) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit()
            );
            if !valid {
                return Err(Error::IllegalEscape(text.to_owned()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_encoding::percent_decode(bytes)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| Error::IllegalEscape(text.to_owned()))
}

/// Number of characters shared at the start of `a` and `b`.
///
/// Binary search over the candidate length; O((n+m) log min(n,m)) character
/// comparisons in the worst case.
pub(crate) fn common_prefix(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() || a[0] != b[0] {
        return 0;
    }

    let mut lo = 0;
    let mut hi = a.len().min(b.len());
    let mut mid = hi;
    let mut start = 0;
    while lo < mid {
        if a[start..mid] == b[start..mid] {
            lo = mid;
            start = lo;
        } else {
            hi = mid;
        }
        mid = (hi - lo) / 2 + lo;
    }
    mid
}

/// Number of characters shared at the end of `a` and `b`.
pub(crate) fn common_suffix(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() || a[a.len() - 1] != b[b.len() - 1] {
        return 0;
    }

    let mut lo = 0;
    let mut hi = a.len().min(b.len());
    let mut mid = hi;
    let mut end = 0;
    while lo < mid {
        if a[a.len() - mid..a.len() - end] == b[b.len() - mid..b.len() - end] {
            lo = mid;
            end = lo;
        } else {
            hi = mid;
        }
        mid = (hi - lo) / 2 + lo;
    }
    mid
}

/// Largest `k` such that the last `k` characters of `a` equal the first `k`
/// characters of `b`.
///
/// Characters are compared as scalar values; visually similar sequences that
/// differ in code points (ligatures, say) never count as overlapping.
pub(crate) fn common_overlap(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Truncate the longer side so both ends line up.
    let a = if a.len() > b.len() {
        &a[a.len() - b.len()..]
    } else {
        a
    };
    let b = if b.len() > a.len() { &b[..a.len()] } else { b };
    let text_length = a.len();

    if a == b {
        return text_length;
    }

    // Grow the candidate overlap one found occurrence at a time.
    let mut best = 0;
    let mut length = 1;
    loop {
        let pattern = &a[text_length - length..];
        let found = match find(b, pattern, 0) {
            Some(found) => found,
            None => return best,
        };
        length += found;
        if found == 0 || a[text_length - length..] == b[..length] {
            best = length;
            length += 1;
        }
    }
}

/// Byte length of the common character prefix of two strings.
///
/// The result is always a char boundary of both strings.
pub(crate) fn common_prefix_bytes(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

/// Byte length of the common character suffix of two strings.
pub(crate) fn common_suffix_bytes(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().rev().zip(b.chars().rev()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

/// First occurrence of `needle` in `haystack` at or after `from`.
///
/// An empty needle is found at `from` (clamped to the end), matching the
/// `indexOf` semantics the patch engine's context growth relies on.
pub(crate) fn find(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    let from = from.min(haystack.len());
    if needle.is_empty() {
        return Some(from);
    }
    if haystack.len() - from < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// Last occurrence of `needle` in `haystack` starting at or before `from`.
///
/// An empty needle is found at `from` (clamped to the end), matching
/// `lastIndexOf`.
pub(crate) fn rfind(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if haystack.len() < needle.len() {
        return None;
    }
    let last = from.min(haystack.len() - needle.len());
    (0..=last).rev().find(|&i| &haystack[i..i + needle.len()] == needle)
}
