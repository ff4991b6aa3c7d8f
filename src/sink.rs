//! Sink: publishes the canonical payload to the remote service.
//!
//! Mirrors [`crate::flags::fetch_flags`]'s client shape (same base URL and
//! bearer token, one blocking call, no retry) but for the write side of
//! the contract.

use serde::Serialize;

use crate::config::RunContext;
use crate::error::ScanError;
use crate::flags::truncate;
use crate::serialize::ReferenceHunksRep;

/// The envelope wrapping the core's output for the `publish` call.
#[derive(Debug, Serialize)]
struct PublishEnvelope<'a> {
    repository: &'a str,
    branch: &'a str,
    sha: &'a str,
    references: &'a [ReferenceHunksRep],
}

/// Publish `reps` to the sink, tagged by repository, branch, and commit.
pub fn publish(ctx: &RunContext, reps: &[ReferenceHunksRep]) -> Result<(), ScanError> {
    let url = format!(
        "{}/api/v2/code-refs/repositories/{}",
        ctx.base_uri.trim_end_matches('/'),
        ctx.repo_name
    );

    let envelope = PublishEnvelope {
        repository: &ctx.repo_name,
        branch: &ctx.branch,
        sha: &ctx.sha,
        references: reps,
    };

    let client = reqwest::blocking::Client::new();
    let mut request = client.post(&url).json(&envelope);
    if let Some(token) = &ctx.access_token {
        request = request.bearer_auth(token);
    }

    let response = request.send().map_err(|e| ScanError::NetworkError {
        url: url.clone(),
        status: None,
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ScanError::NetworkError {
            url,
            status: Some(status.as_u16()),
            message: truncate(&body),
        });
    }

    Ok(())
}
