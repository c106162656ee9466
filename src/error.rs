//! Error types for diff, match, and patch operations.

/// Errors surfaced while decoding deltas, parsing patch text, or matching.
///
/// Fuzzy failures during [`patch_apply`] are reported through its per-patch
/// boolean vector, and a missed match is `Ok(None)` from [`match_main`];
/// neither is an `Error`.
///
/// [`patch_apply`]: crate::DiffMatchPatch::patch_apply
/// [`match_main`]: crate::DiffMatchPatch::match_main
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The pattern handed to the match engine exceeds the configured
    /// `match_max_bits` word size.
    #[error("pattern is {len} characters, longer than the {max_bits}-bit match window")]
    PatternTooLong { len: usize, max_bits: usize },

    /// A percent sequence in a delta or patch body could not be decoded.
    #[error("illegal escape in encoded text: {0:?}")]
    IllegalEscape(String),

    /// A delta token or patch line began with an unknown operation character.
    #[error("invalid operation character: {0:?}")]
    InvalidOp(char),

    /// A delta run length was not a valid non-negative integer.
    #[error("invalid run length in delta token: {0:?}")]
    InvalidDelta(String),

    /// Applying the delta consumed a different number of characters than the
    /// source text contains.
    #[error("delta consumed {consumed} characters, source text has {expected}")]
    DeltaLengthMismatch { consumed: usize, expected: usize },

    /// A line expected to be a patch header did not match `@@ -A[,B] +C[,D] @@`.
    #[error("invalid patch header: {0:?}")]
    InvalidPatchHeader(String),
}
