//! Diff engine: minimal edit scripts between two texts.
//!
//! `diff_main` strips any common prefix and suffix, dispatches the middle to
//! a series of shortcuts (pure insertion/deletion, single-character texts,
//! half-match divide and conquer, line-mode) and finally to Myers bisection,
//! then normalizes the result with `diff_cleanup_merge`.

use std::time::Instant;

use crate::{
    utils::{common_prefix, common_suffix, find},
    DiffMatchPatch,
};

mod bisect;
mod cleanup;
mod delta;
mod lines;


pub use delta::{diff_from_delta, diff_to_delta};

/// One edit in a script: an operation plus the text it covers.
///
/// Scripts produced by [`DiffMatchPatch::diff_main`] satisfy, after cleanup:
/// no two consecutive edits share an operation, no edit is empty, and
/// concatenating the non-insert (resp. non-delete) texts reconstructs the
/// source (resp. destination).
#[derive(Clone, PartialEq, Eq)]
pub enum Diff {
    /// Text present in both the source and destination.
    Equal(String),
    /// Text removed from the source.
    Delete(String),
    /// Text added in the destination.
    Insert(String),
}

impl Diff {
    /// An equality over `text`.
    pub fn equal(text: impl Into<String>) -> Self {
        Diff::Equal(text.into())
    }

    /// A deletion of `text`.
    pub fn delete(text: impl Into<String>) -> Self {
        Diff::Delete(text.into())
    }

    /// An insertion of `text`.
    pub fn insert(text: impl Into<String>) -> Self {
        Diff::Insert(text.into())
    }

    /// The text covered by this edit.
    pub fn text(&self) -> &str {
        match self {
            Diff::Equal(text) | Diff::Delete(text) | Diff::Insert(text) => text,
        }
    }

    pub(crate) fn text_mut(&mut self) -> &mut String {
        match self {
            Diff::Equal(text) | Diff::Delete(text) | Diff::Insert(text) => text,
        }
    }

    /// Length of the covered text in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, Diff::Equal(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Diff::Delete(_))
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Diff::Insert(_))
    }

    /// Rebuild this edit with the same operation over `text`.
    pub(crate) fn with_text(&self, text: String) -> Self {
        match self {
            Diff::Equal(_) => Diff::Equal(text),
            Diff::Delete(_) => Diff::Delete(text),
            Diff::Insert(_) => Diff::Insert(text),
        }
    }
}

impl std::fmt::Debug for Diff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diff::Equal(text) => write!(f, "Equal({:?})", text),
            Diff::Delete(text) => write!(f, "Delete({:?})", text),
            Diff::Insert(text) => write!(f, "Insert({:?})", text),
        }
    }
}

pub(crate) fn text_of(chars: &[char]) -> String {
    chars.iter().collect()
}

/// Source text of a script: the concatenation of all non-insert texts.
pub fn diff_text1(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|diff| !diff.is_insert())
        .map(Diff::text)
        .collect()
}

/// Destination text of a script: the concatenation of all non-delete texts.
pub fn diff_text2(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|diff| !diff.is_delete())
        .map(Diff::text)
        .collect()
}

/// Levenshtein distance of a script, counting a delete/insert pair bounded
/// by equalities as `max(inserted, deleted)` characters.
pub fn diff_levenshtein(diffs: &[Diff]) -> usize {
    let mut levenshtein = 0;
    let mut insertions = 0;
    let mut deletions = 0;
    for diff in diffs {
        match diff {
            Diff::Insert(_) => insertions += diff.char_len(),
            Diff::Delete(_) => deletions += diff.char_len(),
            Diff::Equal(_) => {
                levenshtein += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }
    levenshtein + insertions.max(deletions)
}

/// Map `loc`, a character position in the source text, to its equivalent
/// position in the destination text.
///
/// A position inside a deletion maps to the start of that deletion in
/// destination space.
pub fn diff_x_index(diffs: &[Diff], loc: usize) -> usize {
    let mut chars1 = 0;
    let mut chars2 = 0;
    let mut last_chars1 = 0;
    let mut last_chars2 = 0;
    let mut straddling = None;
    for diff in diffs {
        if !diff.is_insert() {
            chars1 += diff.char_len();
        }
        if !diff.is_delete() {
            chars2 += diff.char_len();
        }
        if chars1 > loc {
            straddling = Some(diff);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }
    match straddling {
        Some(Diff::Delete(_)) => last_chars2,
        _ => last_chars2 + (loc - last_chars1),
    }
}

/// The half-match of two texts: a common middle at least half the longer
/// text long, plus the flanks it splits each text into.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct HalfMatch<'a> {
    pub prefix1: &'a [char],
    pub suffix1: &'a [char],
    pub prefix2: &'a [char],
    pub suffix2: &'a [char],
    pub common: &'a [char],
}

/// Seeded scan for a half-match: take a quarter-length seed of `long` at
/// `i`, and extend every occurrence of it in `short` in both directions.
fn half_match_at<'a>(long: &'a [char], short: &'a [char], i: usize) -> Option<HalfMatch<'a>> {
    let seed = &long[i..i + long.len() / 4];
    let mut best_common: &[char] = &[];
    let mut best_flanks = None;

    let mut j = find(short, seed, 0);
    while let Some(at) = j {
        let prefix_length = common_prefix(&long[i..], &short[at..]);
        let suffix_length = common_suffix(&long[..i], &short[..at]);
        if best_common.len() < suffix_length + prefix_length {
            best_common = &short[at - suffix_length..at + prefix_length];
            best_flanks = Some((
                &long[..i - suffix_length],
                &long[i + prefix_length..],
                &short[..at - suffix_length],
                &short[at + prefix_length..],
            ));
        }
        j = find(short, seed, at + 1);
    }

    if best_common.len() * 2 < long.len() {
        return None;
    }
    let (prefix1, suffix1, prefix2, suffix2) = best_flanks?;
    Some(HalfMatch {
        prefix1,
        suffix1,
        prefix2,
        suffix2,
        common: best_common,
    })
}

impl DiffMatchPatch {
    /// Compute the edit script transforming `text1` into `text2`.
    ///
    /// `checklines` enables the line-mode speedup on large inputs, trading a
    /// little optimality for a lot of speed. The configured `diff_timeout`
    /// bounds the wall-clock cost; on expiry the remaining middle collapses
    /// to one deletion plus one insertion, which is coarser but still
    /// reconstructs both texts.
    pub fn diff_main(&self, text1: &str, text2: &str, checklines: bool) -> Vec<Diff> {
        let text1: Vec<char> = text1.chars().collect();
        let text2: Vec<char> = text2.chars().collect();
        self.diff_internal(&text1, &text2, checklines, self.deadline())
    }

    pub(crate) fn diff_internal(
        &self,
        text1: &[char],
        text2: &[char],
        checklines: bool,
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        if text1 == text2 {
            if text1.is_empty() {
                return Vec::new();
            }
            return vec![Diff::Equal(text_of(text1))];
        }

        // Peel off any common prefix and suffix before the real work.
        let prefix_len = common_prefix(text1, text2);
        let prefix = &text1[..prefix_len];
        let text1 = &text1[prefix_len..];
        let text2 = &text2[prefix_len..];

        let suffix_len = common_suffix(text1, text2);
        let suffix = &text1[text1.len() - suffix_len..];
        let text1 = &text1[..text1.len() - suffix_len];
        let text2 = &text2[..text2.len() - suffix_len];

        let mut diffs = self.diff_compute(text1, text2, checklines, deadline);

        if !prefix.is_empty() {
            diffs.insert(0, Diff::Equal(text_of(prefix)));
        }
        if !suffix.is_empty() {
            diffs.push(Diff::Equal(text_of(suffix)));
        }
        self.diff_cleanup_merge(&mut diffs);
        diffs
    }

    /// Diff the middle block, assuming no common prefix or suffix remains.
    fn diff_compute(
        &self,
        text1: &[char],
        text2: &[char],
        checklines: bool,
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        if text1.is_empty() {
            return vec![Diff::Insert(text_of(text2))];
        }
        if text2.is_empty() {
            return vec![Diff::Delete(text_of(text1))];
        }

        let (long, short) = if text1.len() > text2.len() {
            (text1, text2)
        } else {
            (text2, text1)
        };

        if let Some(i) = find(long, short, 0) {
            // The shorter text sits whole inside the longer one: a pure
            // insertion or pure deletion bracketing an equality.
            let edit = |text: String| {
                if text1.len() > text2.len() {
                    Diff::Delete(text)
                } else {
                    Diff::Insert(text)
                }
            };
            return vec![
                edit(text_of(&long[..i])),
                Diff::Equal(text_of(short)),
                edit(text_of(&long[i + short.len()..])),
            ];
        }

        if short.len() == 1 {
            // Single character and not a substring of the other text: it
            // cannot take part in any equality.
            return vec![Diff::Delete(text_of(text1)), Diff::Insert(text_of(text2))];
        }

        if let Some(half) = self.diff_half_match(text1, text2) {
            let mut diffs = self.diff_internal(half.prefix1, half.prefix2, checklines, deadline);
            diffs.push(Diff::Equal(text_of(half.common)));
            diffs.extend(self.diff_internal(half.suffix1, half.suffix2, checklines, deadline));
            return diffs;
        }

        if checklines && text1.len() > 100 && text2.len() > 100 {
            return self.diff_line_mode(text1, text2, deadline);
        }

        self.diff_bisect_internal(text1, text2, deadline)
    }

    /// Find a substring shared by both texts that is at least half as long
    /// as the longer text.
    ///
    /// Returns `None` in unlimited-time mode: the half-match is a speedup
    /// that may sacrifice minimality.
    pub(crate) fn diff_half_match<'a>(
        &self,
        text1: &'a [char],
        text2: &'a [char],
    ) -> Option<HalfMatch<'a>> {
        if self.diff_timeout() <= 0.0 {
            return None;
        }

        let swapped = text1.len() <= text2.len();
        let (long, short) = if swapped {
            (text2, text1)
        } else {
            (text1, text2)
        };
        if long.len() < 4 || short.len() * 2 < long.len() {
            return None;
        }

        // Seed once at the quarter mark and once at the midpoint.
        let quarter = half_match_at(long, short, (long.len() + 3) / 4);
        let midpoint = half_match_at(long, short, (long.len() + 1) / 2);
        let half = match (quarter, midpoint) {
            (None, None) => return None,
            (Some(half), None) | (None, Some(half)) => half,
            (Some(quarter), Some(midpoint)) => {
                if quarter.common.len() > midpoint.common.len() {
                    quarter
                } else {
                    midpoint
                }
            }
        };

        // Orient the flanks so prefix1/suffix1 always describe text1.
        if swapped {
            Some(HalfMatch {
                prefix1: half.prefix2,
                suffix1: half.suffix2,
                prefix2: half.prefix1,
                suffix2: half.suffix1,
                common: half.common,
            })
        } else {
            Some(half)
        }
    }
}
