//! Parser: turns raw searcher output into ordered, filtered `GrepLine`s.
//!
//! Grounded on the grep-line record pattern in `delta`'s
//! `handlers::grep::{GrepLine, parse_grep_line, GREP_LINE_REGEX}`: a single
//! fixed regex capturing file, separator, line number and code, with a
//! small free function doing the capture-to-struct conversion. The fixed
//! record pattern here (`([^:]+)(:|-)([0-9]+)[:-](.*)`) is narrower than
//! delta's — it is a contract with one specific searcher, not a
//! best-effort parser for several grep dialects.

use path_slash::PathExt as _;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// One parsed, filtered searcher record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepLine {
    pub path: String,
    pub line_num: u64,
    pub text: String,
    pub flag_keys: Vec<String>,
}

fn record_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^:]+)(:|-)([0-9]+)[:-](.*)$").unwrap())
}

fn word_regex(flag: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", regex::escape(flag))).expect("flag keys escape to valid regex")
}

/// Parse raw searcher stdout into an ordered sequence of [`GrepLine`]s.
///
/// `flags` is the configured flag list (order preserved in each line's
/// `flag_keys`); `workspace_prefix` is stripped from each record's path
/// (trailing separator included); `exclude` drops any record whose
/// (post-strip) path it matches anywhere; `ctx < 0` scrubs `text` to an
/// empty string once flag matching has already been computed against the
/// original contents.
pub fn generate_references_from_grep(
    raw: &str,
    flags: &[String],
    workspace_prefix: &str,
    exclude: Option<&Regex>,
    ctx: i64,
) -> Vec<GrepLine> {
    let re = record_regex();
    let mut out = Vec::new();

    for record in raw.lines() {
        let Some(caps) = re.captures(record) else {
            log::debug!("skipping malformed searcher record: {record:?}");
            continue;
        };

        let raw_path = caps.get(1).unwrap().as_str();
        let sep = caps.get(2).unwrap().as_str();
        let Ok(line_num) = caps.get(3).unwrap().as_str().parse::<u64>() else {
            log::debug!("skipping searcher record with unparsable line number: {record:?}");
            continue;
        };
        let text = caps.get(4).unwrap().as_str();

        let path = strip_prefix(raw_path, workspace_prefix);

        if let Some(exclude) = exclude {
            if exclude.is_match(&path) {
                continue;
            }
        }

        let flag_keys = if sep == ":" {
            flags
                .iter()
                .filter(|f| word_regex(f).is_match(text))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        let text = if ctx < 0 { String::new() } else { text.to_string() };

        out.push(GrepLine {
            path,
            line_num,
            text,
            flag_keys,
        });
    }

    out
}

/// Strip the workspace prefix and normalize to forward slashes.
///
/// The output payload's paths are required to use `/` with no leading
/// slash regardless of host platform, so the final conversion goes
/// through `path_slash` rather than assuming the searcher already emits
/// `/`-separated paths.
fn strip_prefix(path: &str, prefix: &str) -> String {
    let stripped = if prefix.is_empty() {
        path
    } else {
        path.strip_prefix(prefix).unwrap_or(path)
    };
    let stripped = stripped.trim_start_matches(['/', '\\']);
    Path::new(stripped).to_slash_lossy().into_owned()
}
