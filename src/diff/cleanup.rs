//! Cleanup passes that normalize and humanize raw edit scripts.
//!
//! `diff_cleanup_merge` establishes the structural invariants every other
//! pass assumes: no empty edits, no adjacent edits of the same operation,
//! and no factorable text left between a deletion and an insertion.
//! `diff_cleanup_semantic` and `diff_cleanup_semantic_lossless` trade edit
//! minimality for human-meaningful boundaries; `diff_cleanup_efficiency`
//! trades it for machine-efficient scripts.

use super::Diff;
use crate::{
    utils::{common_overlap, common_prefix_bytes, common_suffix_bytes},
    DiffMatchPatch,
};

/// Score a boundary between `one` and `two` by how "logical" it looks,
/// 6 (string boundary) down to 0 (interior of a word).
fn semantic_score(one: &str, two: &str) -> u32 {
    let (char1, char2) = match (one.chars().last(), two.chars().next()) {
        (Some(char1), Some(char2)) => (char1, char2),
        // Edges are the best place to split.
        _ => return 6,
    };

    let non_alphanumeric1 = !char1.is_alphanumeric();
    let non_alphanumeric2 = !char2.is_alphanumeric();
    let whitespace1 = non_alphanumeric1 && char1.is_whitespace();
    let whitespace2 = non_alphanumeric2 && char2.is_whitespace();
    let line_break1 = whitespace1 && (char1 == '\n' || char1 == '\r');
    let line_break2 = whitespace2 && (char2 == '\n' || char2 == '\r');
    let blank_line1 = line_break1 && (one.ends_with("\n\n") || one.ends_with("\n\r\n"));
    let blank_line2 = line_break2 && starts_with_blank_line(two);

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alphanumeric1 && !whitespace1 && whitespace2 {
        // End of sentence.
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alphanumeric1 || non_alphanumeric2 {
        1
    } else {
        0
    }
}

/// Whether `text` begins with `\r?\n\r?\n`.
fn starts_with_blank_line(text: &str) -> bool {
    let text = text.strip_prefix('\r').unwrap_or(text);
    let text = match text.strip_prefix('\n') {
        Some(rest) => rest,
        None => return false,
    };
    let text = text.strip_prefix('\r').unwrap_or(text);
    text.starts_with('\n')
}

impl DiffMatchPatch {
    /// Reorder and merge like edit sections, factoring out commonalities.
    ///
    /// Applying this pass twice yields the same script as applying it once.
    pub fn diff_cleanup_merge(&self, diffs: &mut Vec<Diff>) {
        loop {
            if diffs.is_empty() {
                return;
            }

            // First sweep: coalesce runs of deletions and insertions between
            // equalities. The trailing sentinel lets the final run flush.
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
                        pointer += 1;
                    }
                    Diff::Delete(text) => {
                        count_delete += 1;
                        text_delete.push_str(text);
                        pointer += 1;
                    }
                    Diff::Equal(_) => {
                        if count_delete + count_insert > 1 {
                            if count_delete != 0 && count_insert != 0 {
                                // Factor out any common prefix into the
                                // preceding equality.
                                let common = common_prefix_bytes(&text_insert, &text_delete);
                                if common != 0 {
                                    let run_start = pointer - count_delete - count_insert;
                                    if run_start > 0 && diffs[run_start - 1].is_equal() {
                                        diffs[run_start - 1]
                                            .text_mut()
                                            .push_str(&text_insert[..common]);
                                    } else {
                                        diffs.insert(0, Diff::equal(&text_insert[..common]));
                                        pointer += 1;
                                    }
                                    text_insert.drain(..common);
                                    text_delete.drain(..common);
                                }
                                // Factor out any common suffix into the
                                // following equality.
                                let common = common_suffix_bytes(&text_insert, &text_delete);
                                if common != 0 {
                                    let suffix = text_insert.split_off(text_insert.len() - common);
                                    text_delete.truncate(text_delete.len() - common);
                                    diffs[pointer].text_mut().insert_str(0, &suffix);
                                }
                            }
                            let run_start = pointer - count_delete - count_insert;
                            let mut merged = Vec::with_capacity(2);
                            if !text_delete.is_empty() {
                                merged.push(Diff::Delete(std::mem::take(&mut text_delete)));
                            }
                            if !text_insert.is_empty() {
                                merged.push(Diff::Insert(std::mem::take(&mut text_insert)));
                            }
                            let merged_len = merged.len();
                            diffs.splice(run_start..pointer, merged);
                            // Land on the boundary equality so it can still
                            // merge with a preceding one when the whole run
                            // was factored away.
                            pointer = run_start + merged_len;
                        } else if pointer != 0 && diffs[pointer - 1].is_equal() {
                            // Merge this equality into the previous one.
                            let text = std::mem::take(diffs[pointer].text_mut());
                            diffs[pointer - 1].text_mut().push_str(&text);
                            diffs.remove(pointer);
                        } else {
                            pointer += 1;
                        }
                        count_insert = 0;
                        count_delete = 0;
                        text_delete.clear();
                        text_insert.clear();
                    }
                }
            }
            if diffs.last().map_or(false, |diff| diff.text().is_empty()) {
                diffs.pop();
            }

            // Second sweep: single edits surrounded by equalities can
            // sometimes be shifted sideways to eat an equality entirely.
            let mut changes = false;
            let mut pointer = 1;
            while diffs.len() >= 2 && pointer < diffs.len() - 1 {
                if diffs[pointer - 1].is_equal() && diffs[pointer + 1].is_equal() {
                    let previous = diffs[pointer - 1].text().to_owned();
                    let edit = diffs[pointer].text().to_owned();
                    let next = diffs[pointer + 1].text().to_owned();
                    if edit.ends_with(&previous) {
                        // Shift the edit over the previous equality.
                        let shifted =
                            format!("{}{}", previous, &edit[..edit.len() - previous.len()]);
                        *diffs[pointer].text_mut() = shifted;
                        *diffs[pointer + 1].text_mut() = format!("{}{}", previous, next);
                        diffs.remove(pointer - 1);
                        changes = true;
                    } else if edit.starts_with(&next) {
                        // Shift the edit over the next equality.
                        diffs[pointer - 1].text_mut().push_str(&next);
                        *diffs[pointer].text_mut() = format!("{}{}", &edit[next.len()..], next);
                        diffs.remove(pointer + 1);
                        changes = true;
                    }
                }
                pointer += 1;
            }

            if !changes {
                return;
            }
        }
    }

    /// Shift edit boundaries sideways to align with logical boundaries
    /// (word edges, line breaks, blank lines) without changing the texts
    /// the script reconstructs.
    pub fn diff_cleanup_semantic_lossless(&self, diffs: &mut Vec<Diff>) {
        let mut pointer = 1;
        // Intentionally ignore the first and last element (they don't
        // qualify: an edit needs an equality on both sides).
        while !diffs.is_empty() && pointer + 1 < diffs.len() {
            if diffs[pointer - 1].is_equal() && diffs[pointer + 1].is_equal() {
                let mut equality1 = diffs[pointer - 1].text().to_owned();
                let mut edit = diffs[pointer].text().to_owned();
                let mut equality2 = diffs[pointer + 1].text().to_owned();

                // First, slide the edit as far left as possible.
                let common = common_suffix_bytes(&equality1, &edit);
                if common != 0 {
                    let common_string = edit.split_off(edit.len() - common);
                    equality1.truncate(equality1.len() - common);
                    equality2.insert_str(0, &common_string);
                    edit.insert_str(0, &common_string);
                }

                // Then step rightward one character at a time, keeping the
                // best-scoring split. Ties favor the rightmost position.
                let mut best_equality1 = equality1.clone();
                let mut best_edit = edit.clone();
                let mut best_equality2 = equality2.clone();
                let mut best_score =
                    semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
                while let (Some(edit_first), Some(equality2_first)) =
                    (edit.chars().next(), equality2.chars().next())
                {
                    if edit_first != equality2_first {
                        break;
                    }
                    equality1.push(edit_first);
                    edit.remove(0);
                    edit.push(equality2_first);
                    equality2.remove(0);
                    let score =
                        semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
                    if score >= best_score {
                        best_score = score;
                        best_equality1 = equality1.clone();
                        best_edit = edit.clone();
                        best_equality2 = equality2.clone();
                    }
                }

                if diffs[pointer - 1].text() != best_equality1 {
                    // The boundary moved; write the winning arrangement back.
                    if !best_equality1.is_empty() {
                        *diffs[pointer - 1].text_mut() = best_equality1;
                    } else {
                        diffs.remove(pointer - 1);
                        pointer -= 1;
                    }
                    *diffs[pointer].text_mut() = best_edit;
                    if !best_equality2.is_empty() {
                        *diffs[pointer + 1].text_mut() = best_equality2;
                    } else {
                        diffs.remove(pointer + 1);
                        pointer -= 1;
                    }
                }
            }
            pointer += 1;
        }
    }

    /// Eliminate equalities smaller than both their surrounding edit runs,
    /// then expose any overlaps between adjacent deletions and insertions.
    pub fn diff_cleanup_semantic(&self, diffs: &mut Vec<Diff>) {
        let mut changes = false;
        // Indices of candidate equalities.
        let mut equalities: Vec<usize> = Vec::new();
        let mut last_equality: Option<String> = None;
        // Character counts of edits on either side of the candidate.
        let mut length_insertions1 = 0;
        let mut length_deletions1 = 0;
        let mut length_insertions2 = 0;
        let mut length_deletions2 = 0;

        let mut pointer: isize = 0;
        while (pointer as usize) < diffs.len() {
            let index = pointer as usize;
            if diffs[index].is_equal() {
                equalities.push(index);
                length_insertions1 = length_insertions2;
                length_deletions1 = length_deletions2;
                length_insertions2 = 0;
                length_deletions2 = 0;
                last_equality = Some(diffs[index].text().to_owned());
            } else {
                if diffs[index].is_insert() {
                    length_insertions2 += diffs[index].char_len();
                } else {
                    length_deletions2 += diffs[index].char_len();
                }
                // An equality is expendable once it is no longer than the
                // edits on both of its sides.
                let expendable = last_equality.as_ref().map_or(false, |equality| {
                    let length = equality.chars().count();
                    length > 0
                        && length <= length_insertions1.max(length_deletions1)
                        && length <= length_insertions2.max(length_deletions2)
                });
                if expendable {
                    let equality = last_equality.take().unwrap_or_default();
                    let at = equalities[equalities.len() - 1];
                    diffs[at] = Diff::Delete(equality.clone());
                    diffs.insert(at + 1, Diff::Insert(equality));
                    equalities.pop();
                    // The previous equality needs to be rechecked too.
                    equalities.pop();
                    pointer = equalities.last().map_or(-1, |&at| at as isize);
                    length_insertions1 = 0;
                    length_deletions1 = 0;
                    length_insertions2 = 0;
                    length_deletions2 = 0;
                    changes = true;
                }
            }
            pointer += 1;
        }

        if changes {
            self.diff_cleanup_merge(diffs);
        }
        self.diff_cleanup_semantic_lossless(diffs);

        // Find overlaps between adjacent deletions and insertions, e.g.
        // <del>abcxxx</del><ins>xxxdef</ins> -> <del>abc</del>xxx<ins>def</ins>
        // and <del>xxxabc</del><ins>defxxx</ins> -> <ins>def</ins>xxx<del>abc</del>.
        let mut pointer = 1;
        while pointer < diffs.len() {
            if diffs[pointer - 1].is_delete() && diffs[pointer].is_insert() {
                let deletion: Vec<char> = diffs[pointer - 1].text().chars().collect();
                let insertion: Vec<char> = diffs[pointer].text().chars().collect();
                let overlap_length1 = common_overlap(&deletion, &insertion);
                let overlap_length2 = common_overlap(&insertion, &deletion);
                if overlap_length1 >= overlap_length2 {
                    if overlap_length1 * 2 >= deletion.len() || overlap_length1 * 2 >= insertion.len()
                    {
                        diffs.insert(
                            pointer,
                            Diff::Equal(insertion[..overlap_length1].iter().collect()),
                        );
                        diffs[pointer - 1] = Diff::Delete(
                            deletion[..deletion.len() - overlap_length1].iter().collect(),
                        );
                        diffs[pointer + 1] =
                            Diff::Insert(insertion[overlap_length1..].iter().collect());
                        pointer += 1;
                    }
                } else if overlap_length2 * 2 >= deletion.len()
                    || overlap_length2 * 2 >= insertion.len()
                {
                    // Reverse overlap: the insertion's tail matches the
                    // deletion's head, so the insertion moves in front.
                    diffs.insert(
                        pointer,
                        Diff::Equal(deletion[..overlap_length2].iter().collect()),
                    );
                    diffs[pointer - 1] = Diff::Insert(
                        insertion[..insertion.len() - overlap_length2].iter().collect(),
                    );
                    diffs[pointer + 1] =
                        Diff::Delete(deletion[overlap_length2..].iter().collect());
                    pointer += 1;
                }
                pointer += 1;
            }
            pointer += 1;
        }
    }

    /// Eliminate equalities whose retention costs more than re-editing them,
    /// as judged by `diff_edit_cost`.
    pub fn diff_cleanup_efficiency(&self, diffs: &mut Vec<Diff>) {
        let edit_cost = self.diff_edit_cost();
        let mut changes = false;
        // Indices of candidate equalities.
        let mut equalities: Vec<usize> = Vec::new();
        let mut last_equality: Option<String> = None;
        // Is there an insertion/deletion before/after the candidate?
        let mut pre_ins = false;
        let mut pre_del = false;
        let mut post_ins = false;
        let mut post_del = false;

        let mut pointer: isize = 0;
        while (pointer as usize) < diffs.len() {
            let index = pointer as usize;
            if diffs[index].is_equal() {
                if diffs[index].char_len() < edit_cost && (post_ins || post_del) {
                    // Candidate found.
                    equalities.push(index);
                    pre_ins = post_ins;
                    pre_del = post_del;
                    last_equality = Some(diffs[index].text().to_owned());
                } else {
                    // Not worth revisiting once we pass it.
                    equalities.clear();
                    last_equality = None;
                }
                post_ins = false;
                post_del = false;
            } else {
                if diffs[index].is_delete() {
                    post_del = true;
                } else {
                    post_ins = true;
                }
                // Five types to be split:
                // <ins>A</ins><del>B</del>XY<ins>C</ins><del>D</del>
                // <ins>A</ins>X<ins>C</ins><del>D</del>
                // <ins>A</ins><del>B</del>X<ins>C</ins>
                // <ins>A</del>X<ins>C</ins><del>D</del>
                // <ins>A</ins><del>B</del>X<del>C</del>
                let expendable = last_equality.as_ref().map_or(false, |equality| {
                    !equality.is_empty()
                        && ((pre_ins && pre_del && post_ins && post_del)
                            || (equality.chars().count() * 2 < edit_cost
                                && [pre_ins, pre_del, post_ins, post_del]
                                    .iter()
                                    .filter(|&&flag| flag)
                                    .count()
                                    == 3))
                });
                if expendable {
                    let equality = last_equality.take().unwrap_or_default();
                    let at = equalities[equalities.len() - 1];
                    diffs[at] = Diff::Delete(equality.clone());
                    diffs.insert(at + 1, Diff::Insert(equality));
                    equalities.pop();
                    if pre_ins && pre_del {
                        // No changes made which could affect previous entry,
                        // keep going.
                        post_ins = true;
                        post_del = true;
                        equalities.clear();
                    } else {
                        // The previous equality needs to be rechecked.
                        equalities.pop();
                        pointer = equalities.last().map_or(-1, |&at| at as isize);
                        post_ins = false;
                        post_del = false;
                    }
                    changes = true;
                }
            }
            pointer += 1;
        }

        if changes {
            self.diff_cleanup_merge(diffs);
        }
    }
}
