//! Workspace adapter: resolve a working tree to `{workspace, branch, sha}`.
//!
//! Grounded on the `Repository` handle idiom used throughout this crate's
//! ancestry for wrapping `git` subprocess calls: a small struct holding the
//! directory to run commands in, with typed errors instead of bare strings.
//! This crate only needs repository *discovery* and two read-only queries
//! (current branch, head commit) — none of the worktree/branch-mutation
//! surface of a full git wrapper.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ScanError;
use crate::shell_exec::{run, tool_available};

/// A resolved, discoverable git repository rooted at `path`.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Discover the repository rooted at `path`, which must exist, be a
    /// directory, and sit inside a git work tree.
    ///
    /// Resolves `path` to an absolute, canonicalized form so that later
    /// prefix-stripping of searcher output is comparing like with like
    /// regardless of how the caller spelled the directory.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScanError::InvalidWorkspace {
                path: path.display().to_string(),
                reason: "does not exist".to_string(),
            });
        }
        if !path.is_dir() {
            return Err(ScanError::InvalidWorkspace {
                path: path.display().to_string(),
                reason: "is not a directory".to_string(),
            });
        }
        if !tool_available("git") {
            return Err(ScanError::MissingTool {
                tool: "git".to_string(),
            });
        }

        let absolute = dunce::canonicalize(path).map_err(|e| ScanError::InvalidWorkspace {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let repo = Repository { path: absolute };
        // Fail fast if this isn't actually inside a work tree.
        repo.run_command(&["rev-parse", "--is-inside-work-tree"])?;

        Ok(repo)
    }

    /// The absolute, canonicalized workspace path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current branch name.
    ///
    /// A detached HEAD (git prints the literal string `HEAD`) is a fatal
    /// configuration error.
    pub fn current_branch(&self) -> Result<String, ScanError> {
        let branch = self.run_command(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = branch.trim().to_string();
        if branch == "HEAD" {
            return Err(ScanError::DetachedHead);
        }
        Ok(branch)
    }

    /// The head commit SHA (40 hex characters).
    pub fn head_sha(&self) -> Result<String, ScanError> {
        let sha = self.run_command(&["rev-parse", "HEAD"])?;
        Ok(sha.trim().to_string())
    }

    fn logging_context(&self) -> String {
        self.path.display().to_string()
    }

    fn run_command(&self, args: &[&str]) -> Result<String, ScanError> {
        let context = self.logging_context();
        let output = run(
            Command::new("git").args(args).current_dir(&self.path),
            Some(&context),
        )
        .map_err(|e| ScanError::GitCommandFailed {
            command: args.join(" "),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ScanError::GitCommandFailed {
                command: args.join(" "),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn init_repo(dir: &Path) {
        let run_git = |args: &[&str]| {
            let status = Command::new("git")
                .args(args)
                .current_dir(dir)
                .status()
                .expect("git should run");
            assert!(status.success(), "git {args:?} failed");
        };
        run_git(&["init", "-q"]);
        run_git(&["config", "user.email", "test@example.com"]);
        run_git(&["config", "user.name", "test"]);
        run_git(&["checkout", "-q", "-b", "main"]);
        std::fs::write(dir.join("file.txt"), "hello\n").unwrap();
        run_git(&["add", "."]);
        run_git(&["commit", "-q", "-m", "init"]);
    }

    #[test]
    fn discover_rejects_missing_directory() {
        let err = Repository::discover("/no/such/path/flagref-test").unwrap_err();
        assert!(matches!(err, ScanError::InvalidWorkspace { .. }));
    }

    #[test]
    fn discover_rejects_non_git_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Repository::discover(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::GitCommandFailed { .. }));
    }

    #[test]
    fn reports_branch_and_sha_for_a_real_repo() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());

        let repo = Repository::discover(dir.path()).expect("should discover");
        assert_eq!(repo.current_branch().unwrap(), "main");

        let sha = repo.head_sha().unwrap();
        assert_eq!(sha.len(), 40);
        assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn detached_head_is_a_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let repo = Repository::discover(dir.path()).unwrap();
        let sha = repo.head_sha().unwrap();

        Command::new("git")
            .args(["checkout", "-q", &sha])
            .current_dir(dir.path())
            .status()
            .unwrap();

        let err = repo.current_branch().unwrap_err();
        assert!(matches!(err, ScanError::DetachedHead));
    }
}
