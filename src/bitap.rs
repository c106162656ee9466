//! Match engine: locate the best fuzzy occurrence of a pattern in a text
//! near a hinted location.
//!
//! Uses the Bitap algorithm: candidate match states for up to `d` errors are
//! carried in machine words, one bit per pattern position, so each text
//! character updates every candidate at once. Candidates are ranked by a
//! score blending error rate and distance from the hint.

use std::collections::HashMap;

use tracing::trace;

use crate::{DiffMatchPatch, Error};

/// Bitmask per pattern character: bit `len - i - 1` is set for the
/// character at position `i`.
pub(crate) fn match_alphabet(pattern: &[char]) -> HashMap<char, u64> {
    let mut alphabet = HashMap::new();
    for (i, &c) in pattern.iter().enumerate() {
        *alphabet.entry(c).or_insert(0) |= 1 << (pattern.len() - i - 1);
    }
    alphabet
}

/// Score a candidate match of `pattern` at `x` with `errors` errors: 0.0 is
/// perfect, 1.0 is a complete mismatch.
fn bitap_score(
    errors: usize,
    x: usize,
    loc: usize,
    pattern_len: usize,
    match_distance: usize,
) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    let proximity = loc.abs_diff(x);
    if match_distance == 0 {
        // Dodge divide by zero.
        if proximity == 0 {
            accuracy
        } else {
            1.0
        }
    } else {
        accuracy + proximity as f64 / match_distance as f64
    }
}

impl DiffMatchPatch {
    /// Locate the best instance of `pattern` in `text` near `loc`.
    ///
    /// Returns `Ok(None)` when no match scores within `match_threshold`, and
    /// an error only when the pattern is too long for the bit-parallel
    /// window.
    pub fn match_main(&self, text: &str, pattern: &str, loc: usize) -> Result<Option<usize>, Error> {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        self.match_internal(&text, &pattern, loc)
    }

    pub(crate) fn match_internal(
        &self,
        text: &[char],
        pattern: &[char],
        loc: usize,
    ) -> Result<Option<usize>, Error> {
        let loc = loc.min(text.len());
        if text == pattern {
            // Shortcut (potentially not guaranteed by the algorithm).
            return Ok(Some(0));
        }
        if text.is_empty() {
            return Ok(None);
        }
        if loc + pattern.len() <= text.len() && &text[loc..loc + pattern.len()] == pattern {
            // Perfect match at the hinted location.
            return Ok(Some(loc));
        }
        self.match_bitap(text, pattern, loc)
    }

    fn match_bitap(
        &self,
        text: &[char],
        pattern: &[char],
        loc: usize,
    ) -> Result<Option<usize>, Error> {
        if pattern.len() > self.match_max_bits() {
            return Err(Error::PatternTooLong {
                len: pattern.len(),
                max_bits: self.match_max_bits(),
            });
        }

        let alphabet = match_alphabet(pattern);
        let score = |errors: usize, x: usize| {
            bitap_score(errors, x, loc, pattern.len(), self.match_distance())
        };

        // Highest score beyond which we give up.
        let mut score_threshold = self.match_threshold();
        // Is there a nearby exact match? (speedup)
        if let Some(best_loc) = crate::utils::find(text, pattern, loc) {
            score_threshold = score(0, best_loc).min(score_threshold);
            // What about in the other direction? (speedup)
            if let Some(best_loc) = crate::utils::rfind(text, pattern, loc + pattern.len()) {
                score_threshold = score(0, best_loc).min(score_threshold);
            }
        }

        let match_mask: u64 = 1 << (pattern.len() - 1);
        let mut best_loc: Option<usize> = None;

        let mut bin_max = pattern.len() + text.len();
        let mut last_rd: Vec<u64> = Vec::new();
        for d in 0..pattern.len() {
            // Scan for the best match; each iteration allows one more error.
            // Run a binary search to determine how far from `loc` we can
            // stray at this error level.
            let mut bin_min = 0;
            let mut bin_mid = bin_max;
            while bin_min < bin_mid {
                if score(d, loc + bin_mid) <= score_threshold {
                    bin_min = bin_mid;
                } else {
                    bin_max = bin_mid;
                }
                bin_mid = (bin_max - bin_min) / 2 + bin_min;
            }
            // Use the result from this iteration as the maximum for the next.
            bin_max = bin_mid;
            let mut start = (loc as isize - bin_mid as isize + 1).max(1) as usize;
            let finish = (loc + bin_mid).min(text.len()) + pattern.len();

            let mut rd = vec![0u64; finish + 2];
            rd[finish + 1] = (1 << d) - 1;
            let mut j = finish;
            while j >= start {
                let char_match = if j > text.len() {
                    // Out of range.
                    0
                } else {
                    alphabet.get(&text[j - 1]).copied().unwrap_or(0)
                };
                rd[j] = if d == 0 {
                    // First pass: exact match.
                    ((rd[j + 1] << 1) | 1) & char_match
                } else {
                    // Subsequent passes: fuzzy match.
                    (((rd[j + 1] << 1) | 1) & char_match)
                        | (((last_rd[j + 1] | last_rd[j]) << 1) | 1)
                        | last_rd[j + 1]
                };
                if (rd[j] & match_mask) != 0 {
                    let this_score = score(d, j - 1);
                    // This match will almost certainly be better than any
                    // existing match, but double-check anyway.
                    if this_score <= score_threshold {
                        score_threshold = this_score;
                        best_loc = Some(j - 1);
                        if j - 1 > loc {
                            // When passing `loc`, don't exceed our current
                            // distance from it.
                            start = (2 * loc as isize - (j - 1) as isize).max(1) as usize;
                        } else {
                            // Already passed `loc`; downhill from here.
                            break;
                        }
                    }
                }
                j -= 1;
            }
            // No hope for a better match at greater error levels.
            if score(d + 1, loc) > score_threshold {
                break;
            }
            last_rd = rd;
        }

        trace!(?best_loc, score_threshold, "bitap search finished");
        Ok(best_loc)
    }
}
