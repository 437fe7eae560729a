//! The `--host-select` policy, selecting how [`crate::ClientPool::dispatch`]
//! picks a host per call.

use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// Which host a dispatch call returns a client for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Cycle through hosts in order; a single host is a degenerate
    /// specialization that always returns itself.
    RoundRobin,
    /// Prefer the host with the fewest in-flight requests, breaking ties by
    /// the host that finished its previous request longest ago.
    Weighed,
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::RoundRobin => write!(f, "roundrobin"),
            SelectionPolicy::Weighed => write!(f, "weighed"),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "roundrobin" => Ok(SelectionPolicy::RoundRobin),
            "weighed" => Ok(SelectionPolicy::Weighed),
            other => Err(DispatchError::UnknownSelectionPolicy(other.to_string())),
        }
    }
}
