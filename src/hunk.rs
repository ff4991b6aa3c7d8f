//! Hunker: the algorithmic heart of the pipeline.
//!
//! Turns one file's ordered, per-flag-indexed lines into one hunk per
//! (flag, contiguous region), merging adjacent or overlapping occurrences
//! of the same flag. Each flag is hunked independently of the others:
//! two flags sharing a context window produce two overlapping hunks, not
//! one.

use std::collections::BTreeMap;

use crate::aggregate::PerFileBundle;

/// A contiguous rendered excerpt attributed to exactly one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub flag_key: String,
    pub offset: u64,
    pub lines: String,
    pub proj_key: String,
}

/// Run the per-flag hunking pass for a single flag's occurrences.
///
/// `ctx` is clamped to act as `0` for any non-positive value when computing
/// a span (`ctx <= 0` spans are single lines); the "scrub text" behavior
/// for `ctx < 0` was already applied by the parser, so this function only
/// ever concatenates whatever `text` it finds in `bundle.lines`.
fn hunk_one_flag(bundle: &PerFileBundle, flag: &str, ctx: i64, proj_key: &str) -> Vec<Hunk> {
    let span_radius = ctx.max(0) as u64;
    let mut spans: Vec<(u64, u64)> = Vec::new();

    for line in bundle.lines_for_flag(flag) {
        let l = line.line_num;
        let span_start = l.saturating_sub(span_radius).max(1);
        let span_end = l + span_radius;

        match spans.last_mut() {
            Some((_, end)) if span_start <= *end + 1 => {
                *end = (*end).max(span_end);
            }
            _ => spans.push((span_start, span_end)),
        }
    }

    let text_by_line: BTreeMap<u64, &str> = bundle
        .lines
        .iter()
        .map(|l| (l.line_num, l.text.as_str()))
        .collect();

    spans
        .into_iter()
        .map(|(start, end)| {
            let mut lines = String::new();
            for n in start..=end {
                if let Some(text) = text_by_line.get(&n) {
                    lines.push_str(text);
                    lines.push('\n');
                }
            }
            Hunk {
                flag_key: flag.to_string(),
                offset: start,
                lines,
                proj_key: proj_key.to_string(),
            }
        })
        .collect()
}

/// Run the per-flag hunking pass for every flag present in `bundle`'s flag
/// index, returning all produced hunks for this file. Ordering among the
/// returned hunks is not meaningful here; the serializer re-sorts by
/// offset.
pub fn make_hunk_reps(bundle: &PerFileBundle, ctx: i64, proj_key: &str) -> Vec<Hunk> {
    let mut flags: Vec<&String> = bundle.flag_index.keys().collect();
    flags.sort();

    flags
        .into_iter()
        .flat_map(|flag| hunk_one_flag(bundle, flag, ctx, proj_key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_by_path;
    use crate::parse::GrepLine;

    fn line(line_num: u64, text: &str, flags: &[&str]) -> GrepLine {
        GrepLine {
            path: "a/b".to_string(),
            line_num,
            text: text.to_string(),
            flag_keys: flags.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn bundle_for(lines: Vec<GrepLine>) -> PerFileBundle {
        aggregate_by_path(lines).remove("a/b").unwrap()
    }

    #[test]
    fn s1_single_reference_ctx_1() {
        let bundle = bundle_for(vec![
            line(5, "context -1", &[]),
            line(6, "flag-1", &["flag-1"]),
            line(7, "context +1", &[]),
        ]);
        let hunks = make_hunk_reps(&bundle, 1, "test");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].offset, 5);
        assert_eq!(hunks[0].lines, "context -1\nflag-1\ncontext +1\n");
        assert_eq!(hunks[0].flag_key, "flag-1");
    }

    #[test]
    fn s2_two_same_flag_references_coalesce_ctx_1() {
        let bundle = bundle_for(vec![
            line(5, "context", &[]),
            line(6, "flag-1", &["flag-1"]),
            line(7, "context inner", &[]),
            line(8, "flag-1", &["flag-1"]),
            line(9, "context", &[]),
        ]);
        let hunks = make_hunk_reps(&bundle, 1, "test");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].offset, 5);
        assert_eq!(hunks[0].lines, "context\nflag-1\ncontext inner\nflag-1\ncontext\n");
    }

    #[test]
    fn s3_two_different_flags_sharing_context_produce_two_hunks() {
        let bundle = bundle_for(vec![
            line(5, "context -1", &[]),
            line(6, "flag-1", &["flag-1"]),
            line(7, "inner", &[]),
            line(8, "flag-2", &["flag-2"]),
            line(9, "context +1", &[]),
        ]);
        let mut hunks = make_hunk_reps(&bundle, 1, "test");
        hunks.sort_by_key(|h| h.offset);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].flag_key, "flag-1");
        assert_eq!(hunks[0].offset, 5);
        assert_eq!(hunks[0].lines, "context -1\nflag-1\ninner\n");
        assert_eq!(hunks[1].flag_key, "flag-2");
        assert_eq!(hunks[1].offset, 7);
        assert_eq!(hunks[1].lines, "inner\nflag-2\ncontext +1\n");
    }

    #[test]
    fn s4_two_same_flag_references_separated_beyond_window() {
        let bundle = bundle_for(vec![
            line(5, "ctx", &[]),
            line(6, "flag-1", &["flag-1"]),
            line(7, "ctx", &[]),
            line(9, "ctx", &[]),
            line(10, "flag-1", &["flag-1"]),
            line(11, "ctx", &[]),
        ]);
        let mut hunks = make_hunk_reps(&bundle, 1, "test");
        hunks.sort_by_key(|h| h.offset);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].offset, 5);
        assert_eq!(hunks[1].offset, 9);
        assert_eq!(hunks[0].lines.lines().count(), 3);
        assert_eq!(hunks[1].lines.lines().count(), 3);
    }

    #[test]
    fn s6_ctx_negative_one_scrubs_text_to_a_single_newline() {
        let bundle = bundle_for(vec![line(12, "", &["someFlag"])]);
        let hunks = make_hunk_reps(&bundle, -1, "test");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].offset, 12);
        assert_eq!(hunks[0].lines, "\n");
    }

    #[test]
    fn ctx_zero_produces_one_hunk_per_occurrence() {
        let bundle = bundle_for(vec![
            line(1, "flag-1", &["flag-1"]),
            line(2, "flag-1", &["flag-1"]),
        ]);
        let hunks = make_hunk_reps(&bundle, 0, "test");
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].lines, "flag-1\n");
    }

    /// A single-occurrence file as the parser would hand it to the hunker
    /// at a given `ctx`: context lines (and their text) are only present
    /// when `ctx > 0`, and matched text is already scrubbed when `ctx < 0`
    /// (that scrubbing is the parser's job — the hunker just concatenates
    /// whatever text it is given).
    fn single_occurrence_bundle(ctx: i64) -> PerFileBundle {
        if ctx > 0 {
            bundle_for(vec![
                line(4, "before", &[]),
                line(5, "flag-1", &["flag-1"]),
                line(6, "after", &[]),
            ])
        } else if ctx < 0 {
            bundle_for(vec![GrepLine {
                path: "a/b".to_string(),
                line_num: 5,
                text: String::new(),
                flag_keys: vec!["flag-1".to_string()],
            }])
        } else {
            bundle_for(vec![line(5, "flag-1", &["flag-1"])])
        }
    }

    #[rstest::rstest]
    #[case::no_context(0, "flag-1\n")]
    #[case::scrubbed(-1, "\n")]
    #[case::one_line_each_side(1, "before\nflag-1\nafter\n")]
    fn single_occurrence_hunk_shape_by_ctx(#[case] ctx: i64, #[case] expected_lines: &str) {
        let bundle = single_occurrence_bundle(ctx);
        let hunks = make_hunk_reps(&bundle, ctx, "test");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].offset, 5 - ctx.max(0) as u64);
        assert_eq!(hunks[0].lines, expected_lines);
    }
}
