//! Synthetic round-trip latency sampling.
//!
//! RTT values are modeled, not measured: a traced path's hop count sets a
//! base latency, each sample adds independent jitter. The random source is
//! injectable so tests can run against a seeded generator.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ProbeConfig;
use crate::error::XprobeError;
use crate::net::{DeviceKind, Topology};
use crate::trace::{trace_path, PathHop};

/// Result of one latency probe: the traced path plus RTT samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub source: Ipv4Addr,
    pub dest: Ipv4Addr,
    pub generated_at: DateTime<Utc>,
    pub path: Vec<PathHop>,
    /// Individual RTT samples in milliseconds, rounded to two decimals.
    pub samples: Vec<f64>,
    /// Arithmetic mean of the samples, same precision.
    pub avg_ms: f64,
}

impl ProbeReport {
    /// Devices traversed between the endpoints, endpoints inclusive in the
    /// path but not in the count: `path.len() - 1`.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn min_ms(&self) -> f64 {
        self.samples.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_ms(&self) -> f64 {
        self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn sent(&self) -> usize {
        self.samples.len()
    }

    /// The model answers every probe it sends.
    pub fn received(&self) -> usize {
        self.samples.len()
    }

    pub fn loss_pct(&self) -> f64 {
        if self.sent() == 0 {
            0.0
        } else {
            (1.0 - self.received() as f64 / self.sent() as f64) * 100.0
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sample round-trip latency between two addresses using the supplied
/// random source.
///
/// Fails before tracing when an endpoint is unknown or the destination is
/// an inactive host; fails with the partial path when the destination
/// cannot be reached.
pub fn sample_latency_with<R: Rng + ?Sized>(
    topology: &Topology,
    source: Ipv4Addr,
    dest: Ipv4Addr,
    config: &ProbeConfig,
    rng: &mut R,
) -> Result<ProbeReport, XprobeError> {
    topology.device_by_address(source)?;
    let dest_device = topology.device_by_address(dest)?;

    if let DeviceKind::Host { active: false, .. } = dest_device.kind() {
        return Err(XprobeError::InactiveDestination {
            device: dest_device.name().to_string(),
            address: dest,
        });
    }

    let path = trace_path(topology, source, dest)?;
    if path.len() < 2 {
        return Err(XprobeError::Unreachable { source, dest, path });
    }

    let hop_count = path.len() - 1;

    // One per-hop delay factor per call; jitter varies per sample.
    let base_ms = hop_count as f64 * rng.gen_range(config.per_hop_ms.clone());
    let samples: Vec<f64> = (0..config.sample_count)
        .map(|_| round2(base_ms + rng.gen_range(config.jitter_ms.clone())))
        .collect();
    let avg_ms = round2(samples.iter().sum::<f64>() / samples.len() as f64);

    Ok(ProbeReport {
        source,
        dest,
        generated_at: Utc::now(),
        path,
        samples,
        avg_ms,
    })
}

/// [`sample_latency_with`] over the config's seed when set, the thread RNG
/// otherwise.
pub fn sample_latency(
    topology: &Topology,
    source: Ipv4Addr,
    dest: Ipv4Addr,
    config: &ProbeConfig,
) -> Result<ProbeReport, XprobeError> {
    match config.seed {
        Some(seed) => {
            sample_latency_with(topology, source, dest, config, &mut StdRng::seed_from_u64(seed))
        }
        None => sample_latency_with(topology, source, dest, config, &mut rand::thread_rng()),
    }
}
