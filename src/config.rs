use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Tuning for the latency model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// RTT samples per probe.
    pub sample_count: usize,
    /// Per-hop delay factor, drawn once per probe (milliseconds).
    pub per_hop_ms: Range<f64>,
    /// Jitter added independently to each sample (milliseconds).
    pub jitter_ms: Range<f64>,
    /// Seed for a deterministic run; `None` uses the thread RNG.
    pub seed: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sample_count: 3,
            per_hop_ms: 0.5..2.0,
            jitter_ms: -0.3..0.3,
            seed: None,
        }
    }
}

impl ProbeConfig {
    pub fn with_samples(count: usize, seed: Option<u64>) -> Self {
        Self {
            sample_count: count,
            seed,
            ..Default::default()
        }
    }
}
