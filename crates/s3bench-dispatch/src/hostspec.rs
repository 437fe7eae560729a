//! Parsing of the `--host` command-line value: a comma-separated list of
//! endpoints, any of which may use a compact range-expansion syntax such as
//! `host{1...16}:9000` to stand in for sixteen literal endpoints.
//!
//! Grounded on `cli/client.go`'s `parseHosts`, which delegates expansion to
//! `github.com/minio/minio/pkg/ellipses`; that package isn't in the
//! retrieved source, so the `{a...b}` grammar is reimplemented directly from
//! its documented behavior (inclusive range, zero-padding preserved when
//! either bound is zero-padded).

use crate::error::DispatchError;

/// Parse a full `--host` value into the ordered list of endpoints a
/// [`crate::ClientPool`] should dispatch across. Empty entries (from stray
/// commas) are skipped; an empty result is a startup error.
pub fn parse_hosts(spec: &str) -> Result<Vec<String>, DispatchError> {
    let mut hosts = Vec::new();

    for entry in spec.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        hosts.extend(expand_host(entry)?);
    }

    if hosts.is_empty() {
        return Err(DispatchError::NoHosts);
    }

    Ok(hosts)
}

/// Expand a single host entry. An entry with no `{...}` range expands to
/// itself; `prefix{start...end}suffix` expands to one entry per integer in
/// `[start, end]`, preserving the original bound width in decimal digits
/// when either bound has a leading zero (`node{01...10}` yields `node01`
/// through `node10`, not `node1`).
fn expand_host(entry: &str) -> Result<Vec<String>, DispatchError> {
    let Some(open) = entry.find('{') else {
        return Ok(vec![entry.to_string()]);
    };

    let close = entry[open..]
        .find('}')
        .map(|rel| open + rel)
        .ok_or_else(|| DispatchError::BadHostSpec(entry.to_string()))?;

    let prefix = &entry[..open];
    let suffix = &entry[close + 1..];
    let range = &entry[open + 1..close];

    let (start_str, end_str) = range
        .split_once("...")
        .ok_or_else(|| DispatchError::BadHostSpec(entry.to_string()))?;

    let start: u64 = start_str
        .parse()
        .map_err(|_| DispatchError::BadHostSpec(entry.to_string()))?;
    let end: u64 = end_str
        .parse()
        .map_err(|_| DispatchError::BadHostSpec(entry.to_string()))?;

    if start > end {
        return Err(DispatchError::BadHostSpec(entry.to_string()));
    }

    let zero_padded = start_str.starts_with('0') || end_str.starts_with('0');
    let width = start_str.len().max(end_str.len());

    let mut out = Vec::with_capacity((end - start + 1) as usize);
    for n in start..=end {
        let number = if zero_padded {
            format!("{n:0width$}")
        } else {
            n.to_string()
        };
        out.push(format!("{prefix}{number}{suffix}"));
    }

    Ok(out)
}
