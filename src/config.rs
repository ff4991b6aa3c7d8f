//! Layered configuration: CLI flags over environment variables.
//!
//! The CI wrapper that owns the checkout is expected to inject most of
//! these settings via environment variables; the CLI flags exist so a
//! developer can reproduce a run locally. A flag always wins over its
//! environment equivalent when both are present.

use regex::Regex;

use crate::error::ScanError;
use crate::git::Repository;

/// Minimum/maximum accepted values for `--context-lines`.
pub const CONTEXT_MIN: i64 = -1;
pub const CONTEXT_MAX: i64 = 5;

/// Raw settings gathered from CLI flags, before validation.
///
/// Every field is optional here; [`Settings::resolve`] is where missing
/// required values become errors and where defaults are applied.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    pub dir: Option<String>,
    pub proj_key: Option<String>,
    pub context_lines: Option<i64>,
    pub exclude: Option<String>,
    pub base_uri: Option<String>,
    pub access_token: Option<String>,
    pub repo_name: Option<String>,
    pub dry_run: bool,
}

impl Settings {
    /// Layer `self` (CLI flags) over the process environment.
    ///
    /// A `Some` field on `self` is kept as-is; a `None` field is filled in
    /// from the matching `FLAG_REFS_*` variable, if set.
    pub fn layered_over_env(mut self) -> Self {
        self.dir = self.dir.or_else(|| env_var("FLAG_REFS_DIR"));
        self.proj_key = self.proj_key.or_else(|| env_var("FLAG_REFS_PROJ_KEY"));
        self.context_lines = self.context_lines.or_else(|| {
            env_var("FLAG_REFS_CONTEXT_LINES").and_then(|v| v.parse::<i64>().ok())
        });
        self.exclude = self.exclude.or_else(|| env_var("FLAG_REFS_EXCLUDE"));
        self.base_uri = self.base_uri.or_else(|| env_var("FLAG_REFS_BASE_URI"));
        self.access_token = self
            .access_token
            .or_else(|| env_var("FLAG_REFS_ACCESS_TOKEN"));
        self.repo_name = self.repo_name.or_else(|| env_var("FLAG_REFS_REPO_NAME"));
        self
    }

    /// Validate and resolve this configuration into a [`RunContext`],
    /// discovering the repository's branch and head commit along the way.
    pub fn resolve(self) -> Result<RunContext, ScanError> {
        let dir = self.dir.unwrap_or_else(|| ".".to_string());
        let proj_key = self
            .proj_key
            .ok_or(ScanError::MissingSetting { name: "proj-key" })?;
        let repo_name = self
            .repo_name
            .ok_or(ScanError::MissingSetting { name: "repo-name" })?;

        if !self.dry_run && self.access_token.is_none() {
            return Err(ScanError::MissingSetting {
                name: "access-token",
            });
        }

        let context_lines = self.context_lines.unwrap_or(2);
        if !(CONTEXT_MIN..=CONTEXT_MAX).contains(&context_lines) {
            return Err(ScanError::ContextOutOfRange {
                value: context_lines,
            });
        }

        let exclude_pattern = self.exclude.unwrap_or_default();
        let exclude = if exclude_pattern.is_empty() {
            None
        } else {
            Some(
                Regex::new(&exclude_pattern).map_err(|e| ScanError::InvalidExcludePattern {
                    pattern: exclude_pattern.clone(),
                    source: e.to_string(),
                })?,
            )
        };

        let base_uri = self
            .base_uri
            .unwrap_or_else(|| "https://app.launchdarkly.com".to_string());

        let repository = Repository::discover(&dir)?;
        let branch = repository.current_branch()?;
        let sha = repository.head_sha()?;

        Ok(RunContext {
            workspace: repository.path().to_path_buf(),
            branch,
            sha,
            proj_key,
            repo_name,
            context_lines,
            exclude_pattern,
            exclude,
            base_uri,
            access_token: self.access_token,
            dry_run: self.dry_run,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Fully resolved, validated configuration for one run of the pipeline.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub workspace: std::path::PathBuf,
    pub branch: String,
    pub sha: String,
    pub proj_key: String,
    pub repo_name: String,
    pub context_lines: i64,
    pub exclude_pattern: String,
    pub exclude: Option<Regex>,
    pub base_uri: String,
    pub access_token: Option<String>,
    pub dry_run: bool,
}
