use std::net::Ipv4Addr;

use clap::{Parser, Subcommand};

/// Model of a three-tier network: trace paths and probe synthetic RTT
#[derive(Parser, Debug, Clone)]
#[command(name = "xprobe")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show devices by tier plus the declared links
    Topology,

    /// Show routing tables (one device, or all routers)
    Routes {
        /// Device name (e.g. c1, a1, e1)
        device: Option<String>,
    },

    /// Trace the hop-by-hop path between two addresses
    Trace {
        /// Source address
        source: Ipv4Addr,
        /// Destination address
        dest: Ipv4Addr,
    },

    /// Trace a path and sample round-trip latency
    Probe {
        /// Source address
        source: Ipv4Addr,
        /// Destination address
        dest: Ipv4Addr,

        /// Number of RTT samples
        #[arg(short = 'c', long = "count", default_value = "3")]
        count: usize,

        /// Seed the latency model for a deterministic run
        #[arg(long = "seed")]
        seed: Option<u64>,

        /// Emit the report as JSON instead of text
        #[arg(long = "json")]
        json: bool,
    },

    /// Run the canned host-pair demonstration scenarios
    Demo {
        /// Seed the latency model for a deterministic run
        #[arg(long = "seed")]
        seed: Option<u64>,
    },
}

impl Args {
    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Probe { count, .. } = &self.command {
            if *count == 0 {
                return Err("Sample count must be at least 1".into());
            }
            const MAX_SAMPLES: usize = 1000;
            if *count > MAX_SAMPLES {
                return Err(format!("Sample count cannot exceed {}", MAX_SAMPLES));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe() {
        let args = Args::parse_from([
            "xprobe", "probe", "192.168.1.2", "192.168.4.3", "-c", "5", "--seed", "9",
        ]);
        match args.command {
            Command::Probe { source, dest, count, seed, json } => {
                assert_eq!(source, "192.168.1.2".parse::<Ipv4Addr>().unwrap());
                assert_eq!(dest, "192.168.4.3".parse::<Ipv4Addr>().unwrap());
                assert_eq!(count, 5);
                assert_eq!(seed, Some(9));
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_zero_samples_rejected() {
        let args = Args::parse_from(["xprobe", "probe", "192.168.1.2", "192.168.4.3", "-c", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_bad_address_rejected_by_parser() {
        assert!(Args::try_parse_from(["xprobe", "trace", "not-an-ip", "192.168.1.2"]).is_err());
    }
}
