//! Flag list source: fetches the ordered list of flag keys for a project.
//!
//! A thin `reqwest` client call. Order of the response array is preserved
//! end to end, since every downstream ordering guarantee on the flag list
//! traces back to the order this endpoint returns it in.

use serde::Deserialize;

use crate::config::RunContext;
use crate::error::ScanError;

/// One entry of the `GET .../flags` response. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct FlagEntry {
    key: String,
}

/// Fetch the ordered list of flag keys configured for `ctx.proj_key`.
pub fn fetch_flags(ctx: &RunContext) -> Result<Vec<String>, ScanError> {
    let url = format!(
        "{}/api/v2/projects/{}/flags",
        ctx.base_uri.trim_end_matches('/'),
        ctx.proj_key
    );

    let client = reqwest::blocking::Client::new();
    let mut request = client.get(&url);
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

    let entries: Vec<FlagEntry> = response.json().map_err(|e| ScanError::NetworkError {
        url,
        status: Some(status.as_u16()),
        message: e.to_string(),
    })?;

    Ok(entries.into_iter().map(|e| e.key).collect())
}

/// Truncate an error response body to at most `MAX` characters, for
/// inclusion in a [`ScanError::NetworkError`] message. Cuts on a char
/// boundary rather than a byte offset, so a multi-byte UTF-8 character
/// straddling the cutoff doesn't panic.
pub(crate) fn truncate(body: &str) -> String {
    const MAX: usize = 500;
    match body.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &body[..i]),
        None => body.to_string(),
    }
}
