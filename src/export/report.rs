use std::io::Write;

use crate::net::{DeviceKind, RouterRole, Topology};
use crate::probe::ProbeReport;
use crate::trace::PathHop;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Network summary: devices grouped by tier, then the declared links.
pub fn render_topology<W: Write>(topology: &Topology, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "Network configuration ({} devices)", topology.device_count())?;
    writeln!(writer, "{}", RULE)?;

    let tiers: [(&str, Box<dyn Fn(&DeviceKind) -> bool>); 4] = [
        ("Core", Box::new(|k| matches!(k, DeviceKind::Router(RouterRole::Core)))),
        ("Aggregation", Box::new(|k| matches!(k, DeviceKind::Router(RouterRole::Aggregation)))),
        ("Edge", Box::new(|k| matches!(k, DeviceKind::Router(RouterRole::Edge)))),
        ("Host", Box::new(|k| matches!(k, DeviceKind::Host { .. }))),
    ];

    for (label, matches_tier) in &tiers {
        writeln!(writer, "\n{} layer:", label)?;
        for device in topology.devices().filter(|d| matches_tier(d.kind())) {
            writeln!(writer, "  {}", device)?;
            for iface in device.interfaces() {
                writeln!(writer, "    {}: {}", iface.name(), iface)?;
            }
            if let Some(gateway) = device.gateway() {
                writeln!(writer, "    gateway: {}", gateway)?;
            }
        }
    }

    writeln!(writer, "\nLinks:")?;
    for link in topology.links() {
        writeln!(
            writer,
            "  {} <-> {}  {} ({})",
            link.a, link.b, link.medium, link.capacity
        )?;
    }

    Ok(())
}

/// Routing table for one device: directly-connected subnets first, then
/// static routes.
pub fn render_routing_table<W: Write>(
    topology: &Topology,
    device_name: &str,
    mut writer: W,
) -> std::io::Result<()> {
    let Some(device) = topology.device(device_name) else {
        writeln!(writer, "device '{}' not found", device_name)?;
        return Ok(());
    };

    writeln!(writer, "Routing table: {}", device)?;
    writeln!(
        writer,
        "{:<20} {:<8} {:<20} {:<10}",
        "Destination", "Prefix", "Next hop", "Interface"
    )?;
    writeln!(writer, "{}", RULE)?;

    for iface in device.interfaces() {
        writeln!(
            writer,
            "{:<20} /{:<7} {:<20} {:<10}",
            iface.subnet().to_string(),
            iface.prefix(),
            "directly connected",
            iface.name()
        )?;
    }

    for route in device.routes() {
        writeln!(
            writer,
            "{:<20} /{:<7} {:<20} {:<10}",
            route.destination.network().to_string(),
            route.destination.prefix(),
            route.next_hop.to_string(),
            route.interface
        )?;
    }

    Ok(())
}

/// Numbered hop list.
pub fn render_path<W: Write>(path: &[PathHop], mut writer: W) -> std::io::Result<()> {
    for (i, hop) in path.iter().enumerate() {
        writeln!(writer, "  {}. {}", i + 1, hop)?;
    }
    Ok(())
}

/// Full probe report: path, samples, then the statistics block.
pub fn render_probe_report<W: Write>(report: &ProbeReport, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "xprobe {} -> {}", report.source, report.dest)?;
    writeln!(
        writer,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    writeln!(writer, "\nPath:")?;
    render_path(&report.path, &mut writer)?;

    writeln!(writer, "\nSamples:")?;
    for (i, sample) in report.samples.iter().enumerate() {
        writeln!(writer, "  sample {}: {:.2} ms", i + 1, sample)?;
    }

    writeln!(writer, "\nStatistics:")?;
    writeln!(
        writer,
        "  packets sent: {}, received: {}, loss: {:.1}%",
        report.sent(),
        report.received(),
        report.loss_pct()
    )?;
    writeln!(
        writer,
        "  rtt min/avg/max = {:.2}/{:.2}/{:.2} ms",
        report.min_ms(),
        report.avg_ms,
        report.max_ms()
    )?;
    writeln!(writer, "  hops: {}", report.hop_count())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::probe::sample_latency;

    fn render_to_string<F>(render: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_topology_report_lists_tiers_and_links() {
        let topo = Topology::standard().unwrap();
        let out = render_to_string(|w| render_topology(&topo, w));

        for label in ["Core layer:", "Aggregation layer:", "Edge layer:", "Host layer:"] {
            assert!(out.contains(label), "missing {:?}", label);
        }
        assert!(out.contains("Router-Core c1"));
        assert!(out.contains("gateway: 192.168.1.1"));
        assert!(out.contains("c1 <-> a1  Optical fiber (10 Gbps)"));
    }

    #[test]
    fn test_routing_table_directly_connected_first() {
        let topo = Topology::standard().unwrap();
        let out = render_to_string(|w| render_routing_table(&topo, "e1", w));

        let direct = out.find("directly connected").unwrap();
        let routed = out.find("192.168.11.1").unwrap();
        assert!(direct < routed);
        assert!(out.contains("0.0.0.0"));
    }

    #[test]
    fn test_routing_table_unknown_device() {
        let topo = Topology::standard().unwrap();
        let out = render_to_string(|w| render_routing_table(&topo, "nope", w));
        assert!(out.contains("not found"));
    }

    #[test]
    fn test_probe_report_rendering() {
        let topo = Topology::standard().unwrap();
        let config = ProbeConfig::with_samples(3, Some(11));
        let report = sample_latency(
            &topo,
            "192.168.1.2".parse().unwrap(),
            "192.168.4.3".parse().unwrap(),
            &config,
        )
        .unwrap();

        let out = render_to_string(|w| render_probe_report(&report, w));
        assert!(out.contains("xprobe 192.168.1.2 -> 192.168.4.3"));
        assert!(out.contains("1. h1 (192.168.1.2)"));
        assert!(out.contains("7. h8 (192.168.4.3)"));
        assert!(out.contains("sample 3:"));
        assert!(out.contains("loss: 0.0%"));
        assert!(out.contains("hops: 6"));
    }
}
