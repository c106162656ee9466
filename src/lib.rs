//! Tools for diffing, fuzzily matching, and patching plain text
//!
//! ## Overview
//!
//! This library computes the differences between two texts, locates
//! approximate matches of a pattern inside a text, and applies
//! context-carrying patches to texts that may have drifted since the patch
//! was made. The three engines are tightly coupled: patches are built from
//! diffs, and applying a patch uses the match engine to find where it
//! belongs and the diff engine to align what it finds.
//!
//! The diff implementation is based on [Myers' diff algorithm] with a
//! divide-and-conquer middle-snake bisection, a half-match speedup, and a
//! line-mode speedup for large texts. The match engine is a bit-parallel
//! [Bitap] search scored by error rate and distance from a hinted location.
//!
//! Strings are treated as sequences of Unicode scalar values: every
//! position, length, and pattern bit refers to a `char`, never a byte.
//!
//! ## Diffing two texts
//!
//! ```
//! use driftpatch::{Diff, DiffMatchPatch};
//!
//! let dmp = DiffMatchPatch::new();
//! let mut diffs = dmp.diff_main(
//!     "The quick brown fox.",
//!     "The slow brown fox.",
//!     true,
//! );
//! dmp.diff_cleanup_semantic(&mut diffs);
//!
//! assert_eq!(
//!     diffs,
//!     vec![
//!         Diff::equal("The "),
//!         Diff::delete("quick"),
//!         Diff::insert("slow"),
//!         Diff::equal(" brown fox."),
//!     ]
//! );
//! ```
//!
//! ## Making and applying a patch
//!
//! ```
//! use driftpatch::{DiffMatchPatch, PatchInput};
//!
//! let dmp = DiffMatchPatch::new();
//! let patches = dmp.patch_make(PatchInput::Texts(
//!     "The quick brown fox jumps over the lazy dog.",
//!     "That quick brown fox jumped over a lazy dog.",
//! ));
//!
//! // The text has drifted since the patch was made; it still applies.
//! let (patched, applied) = dmp
//!     .patch_apply(&patches, "The quick red rabbit jumps over the tired tiger.")
//!     .unwrap();
//!
//! assert_eq!(patched, "That quick red rabbit jumped over a tired tiger.");
//! assert!(applied.iter().all(|&ok| ok));
//! ```
//!
//! ## Serializing
//!
//! Edit scripts serialize to a compact [delta](diff_to_delta) form that can
//! be rehydrated against the source text, and patch lists serialize to a
//! [textual block format](DiffMatchPatch::patch_to_text) similar to a
//! unified diff with percent-encoded bodies.
//!
//! [Myers' diff algorithm]: http://www.xmailserver.org/diff2.pdf
//! [Bitap]: https://en.wikipedia.org/wiki/Bitap_algorithm

mod bitap;
mod diff;
mod engine;
mod error;
mod format;
mod html;
mod patch;
mod utils;

pub use diff::{
    diff_from_delta, diff_levenshtein, diff_text1, diff_text2, diff_to_delta, diff_x_index, Diff,
};
pub use engine::DiffMatchPatch;
pub use error::Error;
pub use format::DiffFormatter;
pub use html::diff_pretty_html;
pub use patch::{Patch, PatchInput};
