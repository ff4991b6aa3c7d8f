//! Aggregator: groups parsed lines by path, then by flag within each path.
//!
//! Storage here is order-preserving (`Vec`-backed, insertion order) rather
//! than sorted: the aggregator does not re-sort and does not dedupe.
//! Determinism is restored later, at the serializer boundary, not here.

use std::collections::HashMap;

use crate::parse::GrepLine;

/// All lines for one file path, plus a per-flag index into them.
#[derive(Debug, Default)]
pub struct PerFileBundle {
    pub lines: Vec<GrepLine>,
    pub flag_index: HashMap<String, Vec<usize>>,
}

impl PerFileBundle {
    /// The lines in which `flag` occurs, in the order they were appended.
    pub fn lines_for_flag(&self, flag: &str) -> impl Iterator<Item = &GrepLine> {
        self.flag_index
            .get(flag)
            .into_iter()
            .flatten()
            .map(move |&i| &self.lines[i])
    }
}

/// Group an encounter-ordered stream of [`GrepLine`]s by path.
///
/// The returned map's own key order is not relied upon downstream; what
/// matters is that within a bundle, `lines` retains arrival order and
/// `flag_index` tracks exactly the lines whose `flag_keys` contains that
/// flag.
pub fn aggregate_by_path(lines: impl IntoIterator<Item = GrepLine>) -> HashMap<String, PerFileBundle> {
    let mut bundles: HashMap<String, PerFileBundle> = HashMap::new();

    for line in lines {
        let bundle = bundles.entry(line.path.clone()).or_default();
        let index = bundle.lines.len();
        for flag in &line.flag_keys {
            bundle.flag_index.entry(flag.clone()).or_default().push(index);
        }
        bundle.lines.push(line);
    }

    bundles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(path: &str, line_num: u64, flags: &[&str]) -> GrepLine {
        GrepLine {
            path: path.to_string(),
            line_num,
            text: format!("line {line_num}"),
            flag_keys: flags.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn groups_lines_by_path() {
        let lines = vec![line("a.rs", 1, &[]), line("b.rs", 1, &[]), line("a.rs", 2, &[])];
        let bundles = aggregate_by_path(lines);
        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles["a.rs"].lines.len(), 2);
        assert_eq!(bundles["b.rs"].lines.len(), 1);
    }

    #[test]
    fn flag_index_tracks_only_lines_with_that_flag() {
        let lines = vec![
            line("a.rs", 1, &["flagA"]),
            line("a.rs", 2, &[]),
            line("a.rs", 3, &["flagA", "flagB"]),
        ];
        let bundles = aggregate_by_path(lines);
        let bundle = &bundles["a.rs"];

        let a_lines: Vec<u64> = bundle.lines_for_flag("flagA").map(|l| l.line_num).collect();
        assert_eq!(a_lines, vec![1, 3]);

        let b_lines: Vec<u64> = bundle.lines_for_flag("flagB").map(|l| l.line_num).collect();
        assert_eq!(b_lines, vec![3]);

        assert_eq!(bundle.lines_for_flag("flagC").count(), 0);
    }

    #[test]
    fn preserves_arrival_order_within_a_path() {
        let lines = vec![line("a.rs", 5, &[]), line("a.rs", 1, &[]), line("a.rs", 3, &[])];
        let bundles = aggregate_by_path(lines);
        let line_nums: Vec<u64> = bundles["a.rs"].lines.iter().map(|l| l.line_num).collect();
        assert_eq!(line_nums, vec![5, 1, 3]);
    }
}
