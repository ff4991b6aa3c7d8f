//! Serializer: the canonical, deterministic per-path payload for the sink.
//!
//! This is the only place map iteration order is allowed to leak into the
//! computation; the result is sorted back out immediately, since nothing
//! downstream may depend on hash-map order.

use serde::Serialize;

use crate::aggregate::aggregate_by_path;
use crate::hunk::{Hunk, make_hunk_reps};
use crate::parse::GrepLine;

/// One path's hunks, ready for the sink.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReferenceHunksRep {
    pub path: String,
    pub hunks: Vec<HunkRep>,
}

/// Wire shape of a [`Hunk`], matching the sink's documented field names.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HunkRep {
    pub offset: u64,
    pub lines: String,
    #[serde(rename = "projKey")]
    pub proj_key: String,
    #[serde(rename = "flagKey")]
    pub flag_key: String,
}

impl From<Hunk> for HunkRep {
    fn from(h: Hunk) -> Self {
        HunkRep {
            offset: h.offset,
            lines: h.lines,
            proj_key: h.proj_key,
            flag_key: h.flag_key,
        }
    }
}

/// Aggregate, hunk, and canonicalize a run's lines into the sink payload.
///
/// Paths whose hunk list ends up empty are omitted; the outer list is
/// sorted by path and each inner hunk list by offset, so two runs over the
/// same logical input produce byte-identical JSON (P5).
pub fn make_reference_hunks_reps(
    lines: impl IntoIterator<Item = GrepLine>,
    ctx: i64,
    proj_key: &str,
) -> Vec<ReferenceHunksRep> {
    let bundles = aggregate_by_path(lines);

    let mut reps: Vec<ReferenceHunksRep> = bundles
        .into_iter()
        .filter_map(|(path, bundle)| {
            let mut hunks: Vec<HunkRep> = make_hunk_reps(&bundle, ctx, proj_key)
                .into_iter()
                .map(HunkRep::from)
                .collect();
            if hunks.is_empty() {
                return None;
            }
            hunks.sort_by_key(|h| h.offset);
            Some(ReferenceHunksRep { path, hunks })
        })
        .collect();

    reps.sort_by(|a, b| a.path.cmp(&b.path));
    reps
}
