//! Subprocess execution with consistent debug-level tracing.
//!
//! Every external process this crate spawns — `git`, the line-oriented
//! searcher — goes through [`run`] so that a single log line format covers
//! all of them: one consistent trace line regardless of which component
//! issued the call.

use std::process::Command;
use std::time::Instant;

/// Run `cmd`, logging the invocation and its outcome at debug level.
///
/// `context` is a short tag identifying what the command was run for (e.g.
/// a repository path or "searcher"); pass `None` when there's nothing
/// useful to add beyond the command line itself.
pub fn run(cmd: &mut Command, context: Option<&str>) -> std::io::Result<std::process::Output> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    let cmd_str = if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args.join(" "))
    };

    match context {
        Some(ctx) => log::debug!("$ {cmd_str} [{ctx}]"),
        None => log::debug!("$ {cmd_str}"),
    }

    let t0 = Instant::now();
    let result = cmd.output();
    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(output) => log::debug!(
            "[flagref-trace] cmd=\"{cmd_str}\" ctx={} dur={duration_ms:.1}ms ok={}",
            context.unwrap_or("-"),
            output.status.success()
        ),
        Err(e) => log::debug!(
            "[flagref-trace] cmd=\"{cmd_str}\" ctx={} dur={duration_ms:.1}ms err=\"{e}\"",
            context.unwrap_or("-")
        ),
    }

    result
}

/// Check whether `tool` resolves on `PATH`.
pub fn tool_available(tool: &str) -> bool {
    which::which(tool).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_captures_stdout() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let output = run(&mut cmd, Some("test")).expect("echo should spawn");
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[test]
    fn tool_available_finds_a_common_binary() {
        assert!(tool_available("echo"));
    }

    #[test]
    fn tool_available_rejects_bogus_name() {
        assert!(!tool_available("definitely-not-a-real-binary-xyz"));
    }
}
