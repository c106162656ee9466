//! The engine configuration record.

use std::time::{Duration, Instant};

/// Configuration bundle and entry point for the diff, match, and patch
/// engines.
///
/// Each engine call reads the configuration but never mutates it; scripts and
/// patches are plain values owned by the caller.
///
/// ```
/// use driftpatch::{Diff, DiffMatchPatch};
///
/// let dmp = DiffMatchPatch::new();
/// let diffs = dmp.diff_main("abc", "ab123c", false);
/// assert_eq!(
///     diffs,
///     vec![
///         Diff::Equal("ab".into()),
///         Diff::Insert("123".into()),
///         Diff::Equal("c".into()),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DiffMatchPatch {
    diff_timeout: f32,
    diff_edit_cost: usize,
    match_threshold: f64,
    match_distance: usize,
    patch_delete_threshold: f64,
    patch_margin: usize,
    match_max_bits: usize,
}

impl Default for DiffMatchPatch {
    fn default() -> Self {
        Self {
            diff_timeout: 1.0,
            diff_edit_cost: 4,
            match_threshold: 0.5,
            match_distance: 1000,
            patch_delete_threshold: 0.5,
            patch_margin: 4,
            match_max_bits: 32,
        }
    }
}

impl DiffMatchPatch {
    /// Construct an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock budget for [`diff_main`] in seconds. Zero or negative means
    /// unlimited; unlimited mode also disables the half-match speedup so the
    /// diff stays minimal.
    ///
    /// [`diff_main`]: DiffMatchPatch::diff_main
    pub fn set_diff_timeout(&mut self, seconds: f32) -> &mut Self {
        self.diff_timeout = seconds;
        self
    }

    /// Minimum edit size (in characters) worth keeping an equality around
    /// during [`diff_cleanup_efficiency`].
    ///
    /// [`diff_cleanup_efficiency`]: DiffMatchPatch::diff_cleanup_efficiency
    pub fn set_diff_edit_cost(&mut self, cost: usize) -> &mut Self {
        self.diff_edit_cost = cost;
        self
    }

    /// Maximum acceptable Bitap score: 0.0 demands an exact match, 1.0
    /// accepts anything.
    pub fn set_match_threshold(&mut self, threshold: f64) -> &mut Self {
        self.match_threshold = threshold;
        self
    }

    /// Distance in characters from the hinted location that adds 1.0 to a
    /// match score. Zero requires matches at the exact location.
    pub fn set_match_distance(&mut self, distance: usize) -> &mut Self {
        self.match_distance = distance;
        self
    }

    /// Maximum Levenshtein-to-length ratio for an imperfect patch
    /// application to be accepted rather than vetoed.
    pub fn set_patch_delete_threshold(&mut self, threshold: f64) -> &mut Self {
        self.patch_delete_threshold = threshold;
        self
    }

    /// Characters of context carried around each patch. Null padding assigns
    /// one code point per margin character starting at 1, so the margin is
    /// clamped below the surrogate range.
    pub fn set_patch_margin(&mut self, margin: usize) -> &mut Self {
        self.patch_margin = margin.min(0xD7FF);
        self
    }

    /// Bitap pattern length ceiling. Masks are 64-bit words, so values above
    /// 64 are clamped.
    pub fn set_match_max_bits(&mut self, bits: usize) -> &mut Self {
        self.match_max_bits = bits.min(64);
        self
    }

    pub fn diff_timeout(&self) -> f32 {
        self.diff_timeout
    }

    pub fn diff_edit_cost(&self) -> usize {
        self.diff_edit_cost
    }

    pub fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    pub fn match_distance(&self) -> usize {
        self.match_distance
    }

    pub fn patch_delete_threshold(&self) -> f64 {
        self.patch_delete_threshold
    }

    pub fn patch_margin(&self) -> usize {
        self.patch_margin
    }

    pub fn match_max_bits(&self) -> usize {
        self.match_max_bits
    }

    /// Absolute deadline for a diff starting now, or `None` in unlimited
    /// mode.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        if self.diff_timeout > 0.0 {
            Some(Instant::now() + Duration::from_secs_f32(self.diff_timeout))
        } else {
            None
        }
    }
}
