use anyhow::{Context, Result};
use clap::Parser;
use std::io::{stdout, Write};
use std::net::Ipv4Addr;

use xprobe::cli::{Args, Command};
use xprobe::config::ProbeConfig;
use xprobe::error::XprobeError;
use xprobe::export::{export_json, render_path, render_probe_report, render_routing_table, render_topology};
use xprobe::net::Topology;
use xprobe::probe::sample_latency;
use xprobe::trace::trace_path;

/// The six demonstration host pairs from the reference network.
const DEMO_SCENARIOS: &[(&str, &str, &str)] = &[
    ("h1 -> h8, across the full hierarchy", "192.168.1.2", "192.168.4.3"),
    ("h3 -> h5, through the core", "192.168.2.2", "192.168.3.2"),
    ("h1 -> h2, same subnet", "192.168.1.2", "192.168.1.3"),
    ("h5 -> h6, same subnet", "192.168.3.2", "192.168.3.3"),
    ("h2 -> h4, shared aggregation router", "192.168.1.3", "192.168.2.3"),
    ("h7 -> h8, same subnet", "192.168.4.2", "192.168.4.3"),
];

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let topology = Topology::standard().context("Failed to build the reference topology")?;

    match args.command {
        Command::Topology => {
            render_topology(&topology, stdout())?;
        }
        Command::Routes { device } => {
            run_routes(&topology, device.as_deref())?;
        }
        Command::Trace { source, dest } => {
            run_trace(&topology, source, dest)?;
        }
        Command::Probe {
            source,
            dest,
            count,
            seed,
            json,
        } => {
            let config = ProbeConfig::with_samples(count, seed);
            run_probe(&topology, source, dest, &config, json)?;
        }
        Command::Demo { seed } => {
            run_demo(&topology, seed)?;
        }
    }

    Ok(())
}

fn run_routes(topology: &Topology, device: Option<&str>) -> Result<()> {
    let mut out = stdout();
    match device {
        Some(name) => render_routing_table(topology, name, &mut out)?,
        None => {
            // All routers, hosts carry no tables.
            for device in topology.devices().filter(|d| !d.is_host()) {
                render_routing_table(topology, device.name(), &mut out)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn run_trace(topology: &Topology, source: Ipv4Addr, dest: Ipv4Addr) -> Result<()> {
    let mut out = stdout();
    writeln!(out, "Tracing {} -> {}", source, dest)?;
    match trace_path(topology, source, dest) {
        Ok(path) => {
            render_path(&path, &mut out)?;
            writeln!(out, "Destination reached in {} hops.", path.len().saturating_sub(1))?;
            Ok(())
        }
        Err(XprobeError::Unreachable { path, dest, .. }) => {
            render_path(&path, &mut out)?;
            writeln!(out, "Destination {} not reached.", dest)?;
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_probe(
    topology: &Topology,
    source: Ipv4Addr,
    dest: Ipv4Addr,
    config: &ProbeConfig,
    json: bool,
) -> Result<()> {
    match sample_latency(topology, source, dest, config) {
        Ok(report) => {
            if json {
                export_json(&report, stdout())?;
            } else {
                render_probe_report(&report, stdout())?;
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let XprobeError::Unreachable { path, .. } = &e {
                if !path.is_empty() {
                    eprintln!("Partial path:");
                    let mut err_out = std::io::stderr();
                    render_path(path, &mut err_out)?;
                }
            }
            std::process::exit(1);
        }
    }
}

fn run_demo(topology: &Topology, seed: Option<u64>) -> Result<()> {
    let mut out = stdout();
    for (i, (description, source, dest)) in DEMO_SCENARIOS.iter().enumerate() {
        let source: Ipv4Addr = source.parse()?;
        let dest: Ipv4Addr = dest.parse()?;

        writeln!(out, "Scenario {}: {}", i + 1, description)?;
        writeln!(out, "{}", "-".repeat(60))?;

        // Offset the seed per scenario so runs differ but stay reproducible.
        let config = ProbeConfig::with_samples(3, seed.map(|s| s + i as u64));
        match sample_latency(topology, source, dest, &config) {
            Ok(report) => render_probe_report(&report, &mut out)?,
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
        writeln!(out)?;
    }
    Ok(())
}
