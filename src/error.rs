//! Error taxonomy for the scan pipeline.
//!
//! Plain data carried by each variant, with all emoji/color formatting
//! pushed into the `Display` impl so callers can `bail!`/`?` with `anyhow`
//! and still get consistent human-facing output at the top level.

use crate::styling::{ERROR_EMOJI, HINT_EMOJI, error_message, hint_message};

/// Errors that abort the run before any payload is produced.
///
/// Configuration and search failures are fatal; parse anomalies are not
/// (they're logged and dropped in the parser itself, never constructed as
/// a `ScanError`).
#[derive(Debug)]
pub enum ScanError {
    /// The workspace directory does not exist or is not a directory.
    InvalidWorkspace { path: String, reason: String },
    /// A required external tool (git, the searcher) is not on `PATH`.
    MissingTool { tool: String },
    /// The repository is in detached HEAD state.
    DetachedHead,
    /// A git subprocess exited non-zero.
    GitCommandFailed { command: String, stderr: String },
    /// The `--exclude` pattern does not compile as a regex.
    InvalidExcludePattern { pattern: String, source: String },
    /// `--context-lines` fell outside `[-1, 5]`.
    ContextOutOfRange { value: i64 },
    /// A required setting was missing (and had no environment fallback).
    MissingSetting { name: &'static str },
    /// The searcher subprocess exited with an undocumented non-zero code.
    SearchFailed { command: String, message: String },
    /// A network call to the flag-list source or the sink failed.
    NetworkError {
        url: String,
        status: Option<u16>,
        message: String,
    },
}

impl ScanError {
    fn hint(&self) -> Option<&'static str> {
        match self {
            ScanError::InvalidWorkspace { .. } => {
                Some("Check that --dir points at a checked-out working tree")
            }
            ScanError::MissingTool { .. } => {
                Some("Install the tool and make sure it is on PATH")
            }
            ScanError::DetachedHead => {
                Some("CI checkouts usually detach HEAD; pass --branch explicitly if you can't")
            }
            ScanError::ContextOutOfRange { .. } => Some("--context-lines must be between -1 and 5"),
            ScanError::MissingSetting { .. } => {
                Some("Pass the matching flag, or set the matching FLAG_REFS_* environment variable")
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = match self {
            ScanError::InvalidWorkspace { path, reason } => {
                format!("Not a usable workspace directory: {path} ({reason})")
            }
            ScanError::MissingTool { tool } => format!("Required tool not found: {tool}"),
            ScanError::DetachedHead => "Not on a branch (detached HEAD)".to_string(),
            ScanError::GitCommandFailed { command, stderr } => {
                format!("git {command} failed: {stderr}")
            }
            ScanError::InvalidExcludePattern { pattern, source } => {
                format!("Invalid --exclude pattern {pattern:?}: {source}")
            }
            ScanError::ContextOutOfRange { value } => {
                format!("--context-lines={value} is outside the allowed range [-1, 5]")
            }
            ScanError::MissingSetting { name } => format!("Missing required setting: {name}"),
            ScanError::SearchFailed { command, message } => {
                format!("search command `{command}` failed: {message}")
            }
            ScanError::NetworkError {
                url,
                status,
                message,
            } => match status {
                Some(code) => format!("request to {url} failed with status {code}: {message}"),
                None => format!("request to {url} failed: {message}"),
            },
        };

        write!(f, "{}", error_message(body))?;
        if let Some(hint) = self.hint() {
            write!(f, "\n\n{}", hint_message(hint))?;
        }
        Ok(())
    }
}

impl std::error::Error for ScanError {}
