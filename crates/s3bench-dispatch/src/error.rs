//! Startup errors for host-spec parsing and selection-policy configuration.
//!
//! Every variant here is a *startup* error per the error taxonomy: bad
//! configuration discovered before any worker is spawned, fatal, and meant
//! to be printed to stderr by the CLI before a non-zero exit.

#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("no hosts defined")]
    NoHosts,

    #[error("malformed host spec {0:?}")]
    BadHostSpec(String),

    #[error("unknown host-select policy {0:?}, expected one of: roundrobin, weighed")]
    UnknownSelectionPolicy(String),
}
