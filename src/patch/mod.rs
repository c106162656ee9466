//! Patch engine: context-carrying patches and their fuzzy application.
//!
//! A patch localizes a slice of an edit script with coordinates in both the
//! source and destination texts plus surrounding context. Application
//! tolerates drifted text by locating each patch with the match engine and
//! aligning imperfect matches with the diff engine.

mod format;
mod parse;

use tracing::debug;

use crate::{
    diff::{diff_levenshtein, diff_text1, diff_text2, diff_x_index, text_of},
    utils::{find, rfind},
    Diff, DiffMatchPatch, Error,
};

/// A localized group of edits: coordinates and spans in the source
/// (`start1`, `length1`) and destination (`start2`, `length2`) texts, and
/// the script covering them.
///
/// After construction the script opens and closes with equal context,
/// except where it touches a text boundary or has been padded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patch {
    pub diffs: Vec<Diff>,
    pub start1: usize,
    pub start2: usize,
    pub length1: usize,
    pub length2: usize,
}

/// Accepted argument shapes for [`DiffMatchPatch::patch_make`].
///
/// The deprecated upstream shape `(text1, text2, diffs)` ignored its second
/// argument; it is subsumed by [`PatchInput::TextDiffs`].
#[derive(Clone, Copy, Debug)]
pub enum PatchInput<'a> {
    /// Compute the diff of two texts and patch from it.
    Texts(&'a str, &'a str),
    /// Patch from a precomputed script; the source text is reconstructed.
    Diffs(&'a [Diff]),
    /// Patch from a source text and its precomputed script.
    TextDiffs(&'a str, &'a [Diff]),
}

impl DiffMatchPatch {
    /// Build a list of patches to turn one text into another.
    pub fn patch_make(&self, input: PatchInput<'_>) -> Vec<Patch> {
        match input {
            PatchInput::Texts(text1, text2) => {
                let mut diffs = self.diff_main(text1, text2, true);
                if diffs.len() > 2 {
                    self.diff_cleanup_semantic(&mut diffs);
                    self.diff_cleanup_efficiency(&mut diffs);
                }
                self.patch_make_internal(text1, &diffs)
            }
            PatchInput::Diffs(diffs) => {
                // No origin text provided, reconstruct it.
                let text1 = diff_text1(diffs);
                self.patch_make_internal(&text1, diffs)
            }
            PatchInput::TextDiffs(text1, diffs) => self.patch_make_internal(text1, diffs),
        }
    }

    fn patch_make_internal(&self, text1: &str, diffs: &[Diff]) -> Vec<Patch> {
        if diffs.is_empty() {
            return Vec::new();
        }

        let mut patches = Vec::new();
        let mut patch = Patch::default();
        let mut char_count1 = 0;
        let mut char_count2 = 0;
        // Rolling images of the source text: `prepatch` as of the last patch
        // boundary, `postpatch` with the edits seen so far applied.
        let mut prepatch: Vec<char> = text1.chars().collect();
        let mut postpatch: Vec<char> = prepatch.clone();

        for (i, diff) in diffs.iter().enumerate() {
            if patch.diffs.is_empty() && !diff.is_equal() {
                // A new patch starts here.
                patch.start1 = char_count1;
                patch.start2 = char_count2;
            }

            match diff {
                Diff::Insert(text) => {
                    let length = diff.char_len();
                    patch.diffs.push(diff.clone());
                    patch.length2 += length;
                    postpatch.splice(char_count2..char_count2, text.chars());
                }
                Diff::Delete(_) => {
                    let length = diff.char_len();
                    patch.diffs.push(diff.clone());
                    patch.length1 += length;
                    postpatch.splice(char_count2..char_count2 + length, std::iter::empty());
                }
                Diff::Equal(_) => {
                    let length = diff.char_len();
                    if length <= 2 * self.patch_margin()
                        && !patch.diffs.is_empty()
                        && i != diffs.len() - 1
                    {
                        // Small equality inside a patch.
                        patch.diffs.push(diff.clone());
                        patch.length1 += length;
                        patch.length2 += length;
                    }
                    if length >= 2 * self.patch_margin() && !patch.diffs.is_empty() {
                        // Time for a new patch.
                        self.patch_add_context(&mut patch, &prepatch);
                        patches.push(std::mem::take(&mut patch));
                        // The rolling context must catch up with the edits
                        // applied so far.
                        prepatch = postpatch.clone();
                        char_count1 = char_count2;
                    }
                }
            }

            if !diff.is_insert() {
                char_count1 += diff.char_len();
            }
            if !diff.is_delete() {
                char_count2 += diff.char_len();
            }
        }

        if !patch.diffs.is_empty() {
            self.patch_add_context(&mut patch, &prepatch);
            patches.push(patch);
        }
        patches
    }

    /// Grow the context around `patch` until it is unique in `text` (or the
    /// Bitap window is exhausted), then pad by one more margin.
    pub(crate) fn patch_add_context(&self, patch: &mut Patch, text: &[char]) {
        if text.is_empty() {
            return;
        }
        let margin = self.patch_margin();
        let max_pattern = self.match_max_bits().saturating_sub(2 * margin);

        let mut pattern = &text[patch.start2..(patch.start2 + patch.length1).min(text.len())];
        let mut padding = 0;
        while find(text, pattern, 0) != rfind(text, pattern, text.len())
            && pattern.len() < max_pattern
        {
            padding += margin;
            let start = patch.start2.saturating_sub(padding);
            let end = (patch.start2 + patch.length1 + padding).min(text.len());
            pattern = &text[start..end];
        }
        // Add one chunk for good luck.
        padding += margin;

        let prefix = &text[patch.start2.saturating_sub(padding)..patch.start2];
        if !prefix.is_empty() {
            patch.diffs.insert(0, Diff::Equal(text_of(prefix)));
        }
        let suffix_start = (patch.start2 + patch.length1).min(text.len());
        let suffix_end = (patch.start2 + patch.length1 + padding).min(text.len());
        let suffix = &text[suffix_start..suffix_end];
        if !suffix.is_empty() {
            patch.diffs.push(Diff::Equal(text_of(suffix)));
        }

        patch.start1 = patch.start1.saturating_sub(prefix.len());
        patch.start2 = patch.start2.saturating_sub(prefix.len());
        patch.length1 += prefix.len() + suffix.len();
        patch.length2 += prefix.len() + suffix.len();
    }

    /// Prefix and suffix every text a patch set applies to with a run of
    /// low-code-unit characters, so patches touching the text boundaries
    /// still carry matchable context. Returns the padding string.
    pub fn patch_add_padding(&self, patches: &mut Vec<Patch>) -> String {
        let padding_length = self.patch_margin();
        let null_padding: String = (1..=padding_length as u32)
            .map(|code| char::from_u32(code).expect("padding code points are scalar values"))
            .collect();
        if patches.is_empty() {
            return null_padding;
        }

        // Bump all the patches forward.
        for patch in patches.iter_mut() {
            patch.start1 += padding_length;
            patch.start2 += padding_length;
        }

        // Add some padding on start of first diff.
        let patch = patches.first_mut().expect("patches is non-empty");
        if patch.diffs.first().map_or(true, |diff| !diff.is_equal()) {
            patch.diffs.insert(0, Diff::Equal(null_padding.clone()));
            patch.start1 -= padding_length;
            patch.start2 -= padding_length;
            patch.length1 += padding_length;
            patch.length2 += padding_length;
        } else {
            let first_length = patch.diffs[0].char_len();
            if padding_length > first_length {
                // Grow first equality.
                let extra = padding_length - first_length;
                let extra_text: String = null_padding.chars().skip(first_length).collect();
                patch.diffs[0].text_mut().insert_str(0, &extra_text);
                patch.start1 -= extra;
                patch.start2 -= extra;
                patch.length1 += extra;
                patch.length2 += extra;
            }
        }

        // Add some padding on end of last diff.
        let patch = patches.last_mut().expect("patches is non-empty");
        if patch.diffs.last().map_or(true, |diff| !diff.is_equal()) {
            patch.diffs.push(Diff::Equal(null_padding.clone()));
            patch.length1 += padding_length;
            patch.length2 += padding_length;
        } else {
            let last_length = patch.diffs.last().map_or(0, Diff::char_len);
            if padding_length > last_length {
                // Grow last equality.
                let extra = padding_length - last_length;
                let extra_text: String = null_padding.chars().take(extra).collect();
                if let Some(last) = patch.diffs.last_mut() {
                    last.text_mut().push_str(&extra_text);
                }
                patch.length1 += extra;
                patch.length2 += extra;
            }
        }

        null_padding
    }

    /// Split any patch spanning more than `match_max_bits` characters of
    /// source text into a chain of smaller patches with chained context.
    pub fn patch_split_max(&self, patches: &mut Vec<Patch>) {
        let patch_size = self.match_max_bits();
        let margin = self.patch_margin();
        // A fragment must fit its leading context plus at least one more
        // character inside the window; with no room to consume anything,
        // leave the patches whole and let application match them piecewise.
        if patch_size <= 2 * margin {
            return;
        }

        let mut x = 0;
        while x < patches.len() {
            if patches[x].length1 <= patch_size {
                x += 1;
                continue;
            }
            let mut bigpatch = patches.remove(x);
            let mut insert_at = x;
            let mut start1 = bigpatch.start1;
            let mut start2 = bigpatch.start2;
            let mut precontext: Vec<char> = Vec::new();
            while !bigpatch.diffs.is_empty() {
                // Create one of several smaller patches.
                let mut patch = Patch {
                    start1: start1.saturating_sub(precontext.len()),
                    start2: start2.saturating_sub(precontext.len()),
                    ..Patch::default()
                };
                let mut empty = true;
                if !precontext.is_empty() {
                    patch.length1 = precontext.len();
                    patch.length2 = precontext.len();
                    patch.diffs.push(Diff::Equal(text_of(&precontext)));
                }
                while !bigpatch.diffs.is_empty()
                    && patch.length1 < patch_size.saturating_sub(margin)
                {
                    let diff_text: Vec<char> = bigpatch.diffs[0].text().chars().collect();
                    if bigpatch.diffs[0].is_insert() {
                        // Insertions are harmless.
                        patch.length2 += diff_text.len();
                        start2 += diff_text.len();
                        patch.diffs.push(bigpatch.diffs.remove(0));
                        empty = false;
                    } else if bigpatch.diffs[0].is_delete()
                        && patch.diffs.len() == 1
                        && patch.diffs[0].is_equal()
                        && diff_text.len() > 2 * patch_size
                    {
                        // This is a large deletion.  Let it pass in one chunk.
                        patch.length1 += diff_text.len();
                        start1 += diff_text.len();
                        empty = false;
                        patch.diffs.push(bigpatch.diffs.remove(0));
                    } else {
                        // Deletion or equality.  Only take as much as we can stomach.
                        let take = diff_text
                            .len()
                            .min(patch_size - patch.length1 - margin);
                        patch.length1 += take;
                        start1 += take;
                        if bigpatch.diffs[0].is_equal() {
                            patch.length2 += take;
                            start2 += take;
                        } else {
                            empty = false;
                        }
                        patch
                            .diffs
                            .push(bigpatch.diffs[0].with_text(text_of(&diff_text[..take])));
                        if take == diff_text.len() {
                            bigpatch.diffs.remove(0);
                        } else {
                            *bigpatch.diffs[0].text_mut() = text_of(&diff_text[take..]);
                        }
                    }
                }
                // Compute the head context for the next patch.
                let output: Vec<char> = diff_text2(&patch.diffs).chars().collect();
                precontext = output[output.len().saturating_sub(margin)..].to_vec();
                // Append the end context for this patch.
                let remaining: Vec<char> = diff_text1(&bigpatch.diffs).chars().collect();
                let postcontext = &remaining[..margin.min(remaining.len())];
                if !postcontext.is_empty() {
                    patch.length1 += postcontext.len();
                    patch.length2 += postcontext.len();
                    match patch.diffs.last_mut() {
                        Some(last) if last.is_equal() => {
                            last.text_mut().push_str(&text_of(postcontext));
                        }
                        _ => patch.diffs.push(Diff::Equal(text_of(postcontext))),
                    }
                }
                if !empty {
                    patches.insert(insert_at, patch);
                    insert_at += 1;
                }
            }
            x = insert_at;
        }
    }

    /// Serialize a patch list to the textual patch format.
    pub fn patch_to_text(&self, patches: &[Patch]) -> String {
        patches.iter().map(ToString::to_string).collect()
    }

    /// Parse a textual patch list.
    pub fn patch_from_text(&self, text: &str) -> Result<Vec<Patch>, Error> {
        parse::parse(text)
    }

    /// Apply `patches` to `text`, tolerating drifted positions.
    ///
    /// Returns the patched text and one boolean per (split) patch telling
    /// whether it applied. A patch that cannot be located, or whose
    /// located region diverges beyond `patch_delete_threshold`, is skipped
    /// without corrupting the rest.
    pub fn patch_apply(&self, patches: &[Patch], text: &str) -> Result<(String, Vec<bool>), Error> {
        if patches.is_empty() {
            return Ok((text.to_owned(), Vec::new()));
        }

        // Deep copy so the caller's patches survive the padding and
        // splitting below.
        let mut patches = patches.to_vec();
        let null_padding = self.patch_add_padding(&mut patches);
        let padding: Vec<char> = null_padding.chars().collect();
        let mut text: Vec<char> = padding
            .iter()
            .copied()
            .chain(text.chars())
            .chain(padding.iter().copied())
            .collect();
        self.patch_split_max(&mut patches);

        let max_bits = self.match_max_bits();
        // Drift between the expected and actual location of each patch,
        // accumulated as previous patches add or remove text.
        let mut delta: isize = 0;
        let mut results = vec![false; patches.len()];
        for (x, patch) in patches.iter().enumerate() {
            let expected_loc = patch.start2 as isize + delta;
            let hint = expected_loc.max(0) as usize;
            let text1: Vec<char> = diff_text1(&patch.diffs).chars().collect();
            let mut start_loc;
            let mut end_loc = None;
            if text1.len() > max_bits {
                // A large patch: look for its head and tail separately.
                start_loc = self.match_internal(&text, &text1[..max_bits], hint)?;
                if start_loc.is_some() {
                    let tail_hint =
                        (expected_loc + text1.len() as isize - max_bits as isize).max(0) as usize;
                    end_loc =
                        self.match_internal(&text, &text1[text1.len() - max_bits..], tail_hint)?;
                    match (start_loc, end_loc) {
                        (Some(head), Some(tail)) if head < tail => {}
                        // Can't find valid trailing context.  Drop this patch.
                        _ => start_loc = None,
                    }
                }
            } else {
                start_loc = self.match_internal(&text, &text1, hint)?;
            }

            let start_loc = match start_loc {
                None => {
                    // No match found.  Subtract the delta for this failed
                    // patch from subsequent patches.
                    debug!(patch = x, expected_loc, "no match found; patch skipped");
                    delta -= patch.length2 as isize - patch.length1 as isize;
                    continue;
                }
                Some(start_loc) => start_loc,
            };

            // Found a match.  :)
            results[x] = true;
            delta = start_loc as isize - patch.start2 as isize;
            let end = match end_loc {
                Some(end_loc) => (end_loc + max_bits).min(text.len()),
                None => (start_loc + text1.len()).min(text.len()),
            };
            let matched = text[start_loc..end].to_vec();

            if text1 == matched {
                // Perfect match, just shove the replacement text in.
                let replacement: Vec<char> = diff_text2(&patch.diffs).chars().collect();
                text.splice(start_loc..start_loc + text1.len(), replacement);
            } else {
                // Imperfect match.  Diff the located region against the
                // expectation to get a framework of equivalent indices.
                let mut diffs = self.diff_internal(&text1, &matched, false, self.deadline());
                let bad_quality = text1.len() > max_bits
                    && diff_levenshtein(&diffs) as f64 / text1.len() as f64
                        > self.patch_delete_threshold();
                if bad_quality {
                    // The end points match, but the content is unacceptably bad.
                    debug!(patch = x, "located region diverges too far; patch vetoed");
                    results[x] = false;
                } else {
                    self.diff_cleanup_semantic_lossless(&mut diffs);
                    let mut index1 = 0;
                    for diff in &patch.diffs {
                        if !diff.is_equal() {
                            let index2 = diff_x_index(&diffs, index1);
                            if diff.is_insert() {
                                let insertion: Vec<char> = diff.text().chars().collect();
                                text.splice(
                                    start_loc + index2..start_loc + index2,
                                    insertion,
                                );
                            } else {
                                let delete_end =
                                    diff_x_index(&diffs, index1 + diff.char_len());
                                text.splice(
                                    start_loc + index2..start_loc + delete_end,
                                    std::iter::empty(),
                                );
                            }
                        }
                        if !diff.is_delete() {
                            index1 += diff.char_len();
                        }
                    }
                }
            }
        }

        // Strip the padding off.
        let inner_end = text.len().saturating_sub(padding.len());
        let inner = &text[padding.len().min(inner_end)..inner_end];
        Ok((text_of(inner), results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dmp() -> DiffMatchPatch {
        DiffMatchPatch::new()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn from_text_round_trips() {
        let dmp = dmp();
        assert_eq!(dmp.patch_from_text("").unwrap(), vec![]);

        for text in [
            "@@ -21,18 +22,17 @@\n jump\n-s\n+ed\n  over \n-the\n+a\n %0Alaz\n",
            "@@ -1 +1 @@\n-a\n+b\n",
            "@@ -1,3 +0,0 @@\n-abc\n",
            "@@ -0,0 +1,3 @@\n+abc\n",
        ] {
            let patches = dmp.patch_from_text(text).unwrap();
            assert_eq!(dmp.patch_to_text(&patches), text);
        }
    }

    #[test]
    fn from_text_rejects_bad_headers() {
        let dmp = dmp();
        assert_eq!(
            dmp.patch_from_text("Bad\nPatch\n"),
            Err(Error::InvalidPatchHeader("Bad".to_owned()))
        );
    }

    #[test]
    fn to_text_multiple_patches() {
        let dmp = dmp();
        let text = "@@ -1,9 +1,9 @@\n-f\n+F\n oo+fooba\n@@ -7,8 +7,8 @@\n obar\n-,\n+.\n tes\n";
        let patches = dmp.patch_from_text(text).unwrap();
        assert_eq!(dmp.patch_to_text(&patches), text);
    }

    #[test]
    fn add_context_simple() {
        let mut dmp = dmp();
        dmp.set_patch_margin(4);

        let mut patch = dmp
            .patch_from_text("@@ -21,4 +21,10 @@\n-jump\n+somersault\n")
            .unwrap()
            .remove(0);
        dmp.patch_add_context(&mut patch, &chars("The quick brown fox jumps over the lazy dog."));
        assert_eq!(
            patch.to_string(),
            "@@ -17,12 +17,18 @@\n fox \n-jump\n+somersault\n s ov\n"
        );
    }

    #[test]
    fn add_context_short_trailing() {
        let dmp = dmp();
        let mut patch = dmp
            .patch_from_text("@@ -21,4 +21,10 @@\n-jump\n+somersault\n")
            .unwrap()
            .remove(0);
        dmp.patch_add_context(&mut patch, &chars("The quick brown fox jumps."));
        assert_eq!(
            patch.to_string(),
            "@@ -17,10 +17,16 @@\n fox \n-jump\n+somersault\n s.\n"
        );
    }

    #[test]
    fn add_context_short_leading() {
        let dmp = dmp();
        let mut patch = dmp
            .patch_from_text("@@ -3 +3,2 @@\n-e\n+at\n")
            .unwrap()
            .remove(0);
        dmp.patch_add_context(&mut patch, &chars("The quick brown fox jumps."));
        assert_eq!(patch.to_string(), "@@ -1,7 +1,8 @@\n Th\n-e\n+at\n  qui\n");
    }

    #[test]
    fn add_context_grows_past_ambiguity() {
        let dmp = dmp();
        let mut patch = dmp
            .patch_from_text("@@ -3 +3,2 @@\n-e\n+at\n")
            .unwrap()
            .remove(0);
        dmp.patch_add_context(
            &mut patch,
            &chars("The quick brown fox jumps.  The quick brown fox crashes."),
        );
        assert_eq!(
            patch.to_string(),
            "@@ -1,27 +1,28 @@\n Th\n-e\n+at\n  quick brown fox jumps. \n"
        );
    }

    #[test]
    fn make_from_each_input_shape() {
        let dmp = dmp();

        // Null case.
        let patches = dmp.patch_make(PatchInput::Texts("", ""));
        assert_eq!(dmp.patch_to_text(&patches), "");

        let text1 = "The quick brown fox jumps over the lazy dog.";
        let text2 = "That quick brown fox jumped over a lazy dog.";

        // Reversed text order; the second patch header tracks the rolling
        // context, "-21,17 +21,18" rather than "-22,17 +21,18".
        let expected = "@@ -1,8 +1,7 @@\n Th\n-at\n+e\n  qui\n@@ -21,17 +21,18 @@\n jump\n-ed\n+s\n  over \n-a\n+the\n  laz\n";
        let patches = dmp.patch_make(PatchInput::Texts(text2, text1));
        assert_eq!(dmp.patch_to_text(&patches), expected);

        let expected = "@@ -1,11 +1,12 @@\n Th\n-e\n+at\n  quick b\n@@ -22,18 +22,17 @@\n jump\n-s\n+ed\n  over \n-the\n+a\n  laz\n";
        let patches = dmp.patch_make(PatchInput::Texts(text1, text2));
        assert_eq!(dmp.patch_to_text(&patches), expected);

        let diffs = dmp.diff_main(text1, text2, false);
        let patches = dmp.patch_make(PatchInput::Diffs(&diffs));
        assert_eq!(dmp.patch_to_text(&patches), expected);

        let patches = dmp.patch_make(PatchInput::TextDiffs(text1, &diffs));
        assert_eq!(dmp.patch_to_text(&patches), expected);
    }

    #[test]
    fn make_encodes_characters() {
        let dmp = dmp();
        let patches = dmp.patch_make(PatchInput::Texts(
            "`1234567890-=[]\\;',./",
            "~!@#$%^&*()_+{}|:\"<>?",
        ));
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -1,21 +1,21 @@\n-%601234567890-=%5B%5D%5C;',./\n+~!@#$%25%5E&*()_+%7B%7D%7C:%22%3C%3E?\n"
        );
    }

    #[test]
    fn from_text_decodes_characters() {
        let dmp = dmp();
        let diffs = vec![
            Diff::delete("`1234567890-=[]\\;',./"),
            Diff::insert("~!@#$%^&*()_+{}|:\"<>?"),
        ];
        let patches = dmp
            .patch_from_text(
                "@@ -1,21 +1,21 @@\n-%601234567890-=%5B%5D%5C;',./\n+~!@#$%25%5E&*()_+%7B%7D%7C:%22%3C%3E?\n",
            )
            .unwrap();
        assert_eq!(patches[0].diffs, diffs);
    }

    #[test]
    fn make_long_string_with_repeats() {
        let dmp = dmp();
        let text1 = "abcdef".repeat(100);
        let text2 = format!("{}123", text1);
        let patches = dmp.patch_make(PatchInput::Texts(&text1, &text2));
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -573,28 +573,31 @@\n cdefabcdefabcdefabcdefabcdef\n+123\n"
        );
    }

    #[test]
    fn split_max_battery() {
        let dmp = dmp();

        let mut patches = dmp.patch_make(PatchInput::Texts(
            "abcdefghijklmnopqrstuvwxyz01234567890",
            "XabXcdXefXghXijXklXmnXopXqrXstXuvXwxXyzX01X23X45X67X89X0",
        ));
        dmp.patch_split_max(&mut patches);
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -1,32 +1,46 @@\n+X\n ab\n+X\n cd\n+X\n ef\n+X\n gh\n+X\n ij\n+X\n kl\n+X\n mn\n+X\n op\n+X\n qr\n+X\n st\n+X\n uv\n+X\n wx\n+X\n yz\n+X\n 012345\n@@ -25,13 +39,18 @@\n zX01\n+X\n 23\n+X\n 45\n+X\n 67\n+X\n 89\n+X\n 0\n"
        );

        // A deletion longer than twice the window passes through whole.
        let mut patches = dmp.patch_make(PatchInput::Texts(
            "abcdef1234567890123456789012345678901234567890123456789012345678901234567890uvwxyz",
            "abcdefuvwxyz",
        ));
        let before = dmp.patch_to_text(&patches);
        dmp.patch_split_max(&mut patches);
        assert_eq!(dmp.patch_to_text(&patches), before);

        let mut patches = dmp.patch_make(PatchInput::Texts(
            "1234567890123456789012345678901234567890123456789012345678901234567890",
            "abc",
        ));
        dmp.patch_split_max(&mut patches);
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -1,32 +1,4 @@\n-1234567890123456789012345678\n 9012\n@@ -29,32 +1,4 @@\n-9012345678901234567890123456\n 7890\n@@ -57,14 +1,3 @@\n-78901234567890\n+abc\n"
        );

        let mut patches = dmp.patch_make(PatchInput::Texts(
            "abcdefghij , h : 0 , t : 1 abcdefghij , h : 0 , t : 1 abcdefghij , h : 0 , t : 1",
            "abcdefghij , h : 1 , t : 1 abcdefghij , h : 1 , t : 1 abcdefghij , h : 0 , t : 1",
        ));
        dmp.patch_split_max(&mut patches);
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -2,32 +2,32 @@\n bcdefghij , h : \n-0\n+1\n  , t : 1 abcdef\n@@ -29,32 +29,32 @@\n bcdefghij , h : \n-0\n+1\n  , t : 1 abcdef\n"
        );
    }

    #[test]
    fn split_max_without_room_leaves_patches_whole() {
        // A window no bigger than the margins cannot hold any content, so
        // splitting must refuse rather than loop.
        for bits in [0, 4, 8] {
            let mut dmp = dmp();
            dmp.set_match_max_bits(bits);
            let mut patches = dmp.patch_make(PatchInput::Texts(
                "abcdefghijklmnopqrstuvwxyz01234567890",
                "XabXcdXefXghXijXklXmnXopXqrXstXuvXwxXyzX01X23X45X67X89X0",
            ));
            let before = dmp.patch_to_text(&patches);
            dmp.patch_split_max(&mut patches);
            assert_eq!(dmp.patch_to_text(&patches), before);
        }
    }

    #[test]
    fn add_padding_battery() {
        let dmp = dmp();

        // Both edges full.
        let mut patches = dmp.patch_make(PatchInput::Texts("", "test"));
        assert_eq!(dmp.patch_to_text(&patches), "@@ -0,0 +1,4 @@\n+test\n");
        dmp.patch_add_padding(&mut patches);
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -1,8 +1,12 @@\n %01%02%03%04\n+test\n %01%02%03%04\n"
        );

        // Both edges partial.
        let mut patches = dmp.patch_make(PatchInput::Texts("XY", "XtestY"));
        assert_eq!(dmp.patch_to_text(&patches), "@@ -1,2 +1,6 @@\n X\n+test\n Y\n");
        dmp.patch_add_padding(&mut patches);
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -2,8 +2,12 @@\n %02%03%04X\n+test\n Y%01%02%03\n"
        );

        // Both edges none.
        let mut patches = dmp.patch_make(PatchInput::Texts("XXXXYYYY", "XXXXtestYYYY"));
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -1,8 +1,12 @@\n XXXX\n+test\n YYYY\n"
        );
        dmp.patch_add_padding(&mut patches);
        assert_eq!(
            dmp.patch_to_text(&patches),
            "@@ -5,8 +5,12 @@\n XXXX\n+test\n YYYY\n"
        );
    }

    #[test]
    fn apply_battery() {
        let mut dmp = dmp();
        dmp.set_match_distance(1000)
            .set_match_threshold(0.5)
            .set_patch_delete_threshold(0.5);

        // Null case.
        let patches = dmp.patch_make(PatchInput::Texts("", ""));
        let results = dmp.patch_apply(&patches, "Hello world.").unwrap();
        assert_eq!(results, ("Hello world.".to_owned(), vec![]));

        // Exact match.
        let patches = dmp.patch_make(PatchInput::Texts(
            "The quick brown fox jumps over the lazy dog.",
            "That quick brown fox jumped over a lazy dog.",
        ));
        let results = dmp
            .patch_apply(&patches, "The quick brown fox jumps over the lazy dog.")
            .unwrap();
        assert_eq!(
            results,
            (
                "That quick brown fox jumped over a lazy dog.".to_owned(),
                vec![true, true]
            )
        );

        // Partial match against drifted text.
        let results = dmp
            .patch_apply(&patches, "The quick red rabbit jumps over the tired tiger.")
            .unwrap();
        assert_eq!(
            results,
            (
                "That quick red rabbit jumped over a tired tiger.".to_owned(),
                vec![true, true]
            )
        );

        // Failed match.
        let results = dmp
            .patch_apply(&patches, "I am the very model of a modern major general.")
            .unwrap();
        assert_eq!(
            results,
            (
                "I am the very model of a modern major general.".to_owned(),
                vec![false, false]
            )
        );

        // Big delete, small change.
        let patches = dmp.patch_make(PatchInput::Texts(
            "x1234567890123456789012345678901234567890123456789012345678901234567890y",
            "xabcy",
        ));
        let results = dmp
            .patch_apply(
                &patches,
                "x123456789012345678901234567890-----++++++++++-----123456789012345678901234567890y",
            )
            .unwrap();
        assert_eq!(results, ("xabcy".to_owned(), vec![true, true]));

        // Big delete, big change: the deletion quality veto fires.
        let patches = dmp.patch_make(PatchInput::Texts(
            "x1234567890123456789012345678901234567890123456789012345678901234567890y",
            "xabcy",
        ));
        let results = dmp
            .patch_apply(
                &patches,
                "x12345678901234567890---------------++++++++++---------------12345678901234567890y",
            )
            .unwrap();
        assert_eq!(
            results,
            (
                "xabc12345678901234567890---------------++++++++++---------------12345678901234567890y"
                    .to_owned(),
                vec![false, true]
            )
        );

        // Same but with a looser delete threshold.
        dmp.set_patch_delete_threshold(0.6);
        let patches = dmp.patch_make(PatchInput::Texts(
            "x1234567890123456789012345678901234567890123456789012345678901234567890y",
            "xabcy",
        ));
        let results = dmp
            .patch_apply(
                &patches,
                "x12345678901234567890---------------++++++++++---------------12345678901234567890y",
            )
            .unwrap();
        assert_eq!(results, ("xabcy".to_owned(), vec![true, true]));
        dmp.set_patch_delete_threshold(0.5);

        // Compensate for failed patch.
        dmp.set_match_threshold(0.0).set_match_distance(0);
        let patches = dmp.patch_make(PatchInput::Texts(
            "abcdefghijklmnopqrstuvwxyz--------------------1234567890",
            "abcXXXXXXXXXXdefghijklmnopqrstuvwxyz--------------------1234567YYYYYYYYYY890",
        ));
        let results = dmp
            .patch_apply(&patches, "ABCDEFGHIJKLMNOPQRSTUVWXYZ--------------------1234567890")
            .unwrap();
        assert_eq!(
            results,
            (
                "ABCDEFGHIJKLMNOPQRSTUVWXYZ--------------------1234567YYYYYYYYYY890".to_owned(),
                vec![false, true]
            )
        );
        dmp.set_match_threshold(0.5).set_match_distance(1000);
    }

    #[test]
    fn apply_has_no_side_effects() {
        let dmp = dmp();

        let patches = dmp.patch_make(PatchInput::Texts("", "test"));
        let before = dmp.patch_to_text(&patches);
        dmp.patch_apply(&patches, "").unwrap();
        assert_eq!(dmp.patch_to_text(&patches), before);

        // Major delete gets padded and split internally; the originals
        // must still be untouched.
        let patches = dmp.patch_make(PatchInput::Texts(
            "The quick brown fox jumps over the lazy dog.",
            "Woof",
        ));
        let before = dmp.patch_to_text(&patches);
        dmp.patch_apply(&patches, "The quick brown fox jumps over the lazy dog.")
            .unwrap();
        assert_eq!(dmp.patch_to_text(&patches), before);
    }

    #[test]
    fn apply_at_the_edges() {
        let dmp = dmp();

        // Edge exact match.
        let patches = dmp.patch_make(PatchInput::Texts("", "test"));
        let results = dmp.patch_apply(&patches, "").unwrap();
        assert_eq!(results, ("test".to_owned(), vec![true]));

        // Near edge exact match.
        let patches = dmp.patch_make(PatchInput::Texts("XY", "XtestY"));
        let results = dmp.patch_apply(&patches, "XY").unwrap();
        assert_eq!(results, ("XtestY".to_owned(), vec![true]));

        // Edge partial match.
        let patches = dmp.patch_make(PatchInput::Texts("y", "y123"));
        let results = dmp.patch_apply(&patches, "x").unwrap();
        assert_eq!(results, ("x123".to_owned(), vec![true]));

        // Applying a delete patch to an empty text.
        let patches = dmp.patch_make(PatchInput::Texts("test", ""));
        let results = dmp.patch_apply(&patches, "").unwrap();
        assert_eq!(results, ("".to_owned(), vec![true]));
    }
}
