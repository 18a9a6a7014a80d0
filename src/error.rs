use std::net::Ipv4Addr;
use thiserror::Error;

use crate::trace::PathHop;

/// Error type for topology queries, tracing and probing.
///
/// All variants are recoverable: queries over a static topology are
/// deterministic, so callers report the failure instead of retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XprobeError {
    /// No device owns the queried address (exact match, not subnet membership).
    #[error("no device owns address {0}")]
    AddressNotFound(Ipv4Addr),

    /// The device is not on the destination network and has no matching
    /// entry in its routing table.
    #[error("{device} has no route to {dest}")]
    NoRoute { device: String, dest: Ipv4Addr },

    /// The trace stopped before reaching the destination: routing loop,
    /// missing next hop, host mid-path, or no route along the way.
    /// Carries the partial path gathered up to the stop point.
    #[error("destination {dest} unreachable from {source} (stopped after {} hops)", .path.len().saturating_sub(1))]
    Unreachable {
        // Raw identifier keeps thiserror from treating this plain address
        // field as the error's `source()`; to callers it is still `source`.
        r#source: Ipv4Addr,
        dest: Ipv4Addr,
        path: Vec<PathHop>,
    },

    /// Latency probe against a host marked inactive.
    #[error("destination host {device} ({address}) is inactive")]
    InactiveDestination { device: String, address: Ipv4Addr },

    /// Construction-time validation failure (duplicate address, dangling
    /// neighbor, bad egress interface, ...).
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}
