//! Searcher: invokes an external line-oriented search tool over a workspace.
//!
//! The tool itself is treated as a black box, out of scope for this crate
//! to reimplement: this module only knows how to build its alternation
//! pattern, invoke it through [`crate::shell_exec::run`] so its invocation
//! gets the same debug trace line as every `git` call, and normalize its
//! "no matches" exit code. `ripgrep` is assumed present on `PATH` as `rg`,
//! the same tool the searcher-record regex in [`crate::parse`] is modeled
//! on (its `path:lineNo:text` / `path-lineNo-text` convention).

use std::process::Command;

use regex::escape;

use crate::error::ScanError;
use crate::shell_exec::{run, tool_available};

/// ripgrep's documented exit code for "completed, zero matches".
const RG_NO_MATCHES: i32 = 1;

/// Build the single alternation regex `\b(escape(f1)|escape(f2)|...)\b`
/// matching any of `flags` as a whole word.
pub fn pattern_for(flags: &[String]) -> String {
    let alternatives: Vec<String> = flags.iter().map(|f| escape(f)).collect();
    format!(r"\b({})\b", alternatives.join("|"))
}

/// Run the external searcher over `workspace` for `flags`, returning its
/// raw stdout (one record per line, searcher-native format).
///
/// `ctx` is the context-line count: a positive value is passed through to
/// the searcher's own context flag; zero or negative values search without
/// surrounding context (the parser is responsible for `ctx < 0`'s
/// "scrub text" behavior, not the searcher).
pub fn search(workspace: &std::path::Path, flags: &[String], ctx: i64) -> Result<String, ScanError> {
    if !tool_available("rg") {
        return Err(ScanError::MissingTool {
            tool: "rg".to_string(),
        });
    }

    let pattern = pattern_for(flags);

    let mut cmd = Command::new("rg");
    cmd.current_dir(workspace)
        .arg("--line-number")
        .arg("--no-heading")
        .arg("--with-filename")
        .arg("--case-sensitive")
        .arg("--no-config");
    if ctx > 0 {
        cmd.arg("--context").arg(ctx.to_string());
    }
    // Pass the workspace as an explicit search path (rather than relying on
    // `current_dir` alone) so ripgrep prints absolute paths, matching the
    // `<absPath><sep><lineNum><sep><text>` searcher contract the parser
    // expects to strip a workspace prefix from.
    cmd.arg("--").arg(&pattern).arg(workspace);

    let output = run(&mut cmd, Some("searcher")).map_err(|e| ScanError::SearchFailed {
        command: format!("rg {pattern}"),
        message: e.to_string(),
    })?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    if output.status.code() == Some(RG_NO_MATCHES) {
        return Ok(String::new());
    }

    Err(ScanError::SearchFailed {
        command: format!("rg {pattern}"),
        message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
