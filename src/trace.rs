//! Iterative hop-by-hop path tracing over a topology.

use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::XprobeError;
use crate::net::{NextHop, Topology};

/// One traversed device in a traced path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathHop {
    pub device: String,
    pub address: Ipv4Addr,
}

impl PathHop {
    pub fn new(device: impl Into<String>, address: Ipv4Addr) -> Self {
        Self {
            device: device.into(),
            address,
        }
    }
}

impl fmt::Display for PathHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.device, self.address)
    }
}

/// Walk from `source` towards `dest`, one route decision per device.
///
/// A host source always moves to its configured gateway first; hosts never
/// consult routing tables and may not appear mid-path. The walk is bounded
/// by a visited set keyed by device name, so a misconfigured static table
/// terminates after at most one pass over the device set even when several
/// addresses alias the same device.
///
/// On success the returned path starts at the source owner and ends at the
/// destination owner. Any failure along the way (loop, missing next hop,
/// host mid-path, no route) yields [`XprobeError::Unreachable`] carrying
/// the partial path gathered so far.
pub fn trace_path(
    topology: &Topology,
    source: Ipv4Addr,
    dest: Ipv4Addr,
) -> Result<Vec<PathHop>, XprobeError> {
    let source_device = topology.device_by_address(source)?;
    let mut path = vec![PathHop::new(source_device.name(), source)];

    // Source and destination coincide: nothing to traverse.
    if source == dest {
        return Ok(path);
    }

    let unreachable = |path: Vec<PathHop>| XprobeError::Unreachable {
        source,
        dest,
        path,
    };

    let mut visited: HashSet<String> = HashSet::new();
    let mut current = source;

    if let Some(gateway) = source_device.gateway() {
        visited.insert(source_device.name().to_string());
        current = gateway;
        match topology.device_by_address(gateway) {
            Ok(device) => path.push(PathHop::new(device.name(), gateway)),
            Err(_) => return Err(unreachable(path)),
        }
    }

    while current != dest {
        let device = match topology.device_by_address(current) {
            Ok(device) => device,
            Err(_) => return Err(unreachable(path)),
        };

        // Hosts terminate or originate traces; one mid-path is an error.
        if device.is_host() {
            return Err(unreachable(path));
        }

        if !visited.insert(device.name().to_string()) {
            return Err(unreachable(path));
        }

        let decision = match device.resolve_route(dest) {
            Ok(decision) => decision,
            Err(_) => return Err(unreachable(path)),
        };

        match decision.next_hop {
            NextHop::Direct => {
                match topology.device_by_address(dest) {
                    Ok(device) => path.push(PathHop::new(device.name(), dest)),
                    Err(_) => return Err(unreachable(path)),
                }
                current = dest;
            }
            NextHop::Via(next) => {
                match topology.device_by_address(next) {
                    Ok(device) => path.push(PathHop::new(device.name(), next)),
                    Err(_) => return Err(unreachable(path)),
                }
                current = next;
            }
        }
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Device, RouterRole};

    fn addr(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    fn names(path: &[PathHop]) -> Vec<&str> {
        path.iter().map(|h| h.device.as_str()).collect()
    }

    #[test]
    fn test_trace_to_self_is_single_hop() {
        let topo = Topology::standard().unwrap();
        let path = trace_path(&topo, addr("192.168.1.2"), addr("192.168.1.2")).unwrap();
        assert_eq!(names(&path), vec!["h1"]);
    }

    #[test]
    fn test_same_subnet_is_three_hops() {
        let topo = Topology::standard().unwrap();
        let path = trace_path(&topo, addr("192.168.1.2"), addr("192.168.1.3")).unwrap();
        assert_eq!(names(&path), vec!["h1", "e1", "h2"]);
        assert_eq!(path.last().unwrap().address, addr("192.168.1.3"));
    }

    #[test]
    fn test_full_hierarchy_crossing() {
        let topo = Topology::standard().unwrap();
        let path = trace_path(&topo, addr("192.168.1.2"), addr("192.168.4.3")).unwrap();
        assert_eq!(names(&path), vec!["h1", "e1", "a1", "c1", "a2", "e4", "h8"]);

        let addrs: Vec<Ipv4Addr> = path.iter().map(|h| h.address).collect();
        assert_eq!(
            addrs,
            vec![
                addr("192.168.1.2"),
                addr("192.168.1.1"),
                addr("192.168.11.1"),
                addr("192.168.21.1"),
                addr("192.168.22.2"),
                addr("192.168.14.1"),
                addr("192.168.4.3"),
            ]
        );
    }

    #[test]
    fn test_sibling_subnets_stay_below_core() {
        let topo = Topology::standard().unwrap();
        // h2 -> h4 shares a1; the core is never touched.
        let path = trace_path(&topo, addr("192.168.1.3"), addr("192.168.2.3")).unwrap();
        assert_eq!(names(&path), vec!["h2", "e1", "a1", "e2", "h4"]);
    }

    #[test]
    fn test_trace_to_router_address() {
        let topo = Topology::standard().unwrap();
        let path = trace_path(&topo, addr("192.168.1.2"), addr("192.168.1.1")).unwrap();
        assert_eq!(names(&path), vec!["h1", "e1"]);
    }

    #[test]
    fn test_unknown_source_fails() {
        let topo = Topology::standard().unwrap();
        let err = trace_path(&topo, addr("10.0.0.1"), addr("192.168.1.2")).unwrap_err();
        assert_eq!(err, XprobeError::AddressNotFound(addr("10.0.0.1")));
    }

    #[test]
    fn test_unknown_destination_yields_partial_path() {
        let topo = Topology::standard().unwrap();
        // Only the edge default route matches 10.0.0.1; a1 enumerates known
        // subnets and has no default, so the walk stops there.
        let err = trace_path(&topo, addr("192.168.1.2"), addr("10.0.0.1")).unwrap_err();
        match err {
            XprobeError::Unreachable { path, .. } => {
                assert_eq!(names(&path), vec!["h1", "e1", "a1"]);
            }
            other => panic!("expected Unreachable, got {:?}", other),
        }
    }

    /// Two routers pointing their default routes at each other.
    fn looping_topology() -> Topology {
        let mut topo = Topology::new();

        let mut r1 = Device::router("r1", RouterRole::Edge);
        r1.add_interface("eth0", addr("10.0.0.1"), 30).unwrap();
        r1.add_route("0.0.0.0/0".parse().unwrap(), NextHop::Via(addr("10.0.0.2")), "eth0");

        let mut r2 = Device::router("r2", RouterRole::Edge);
        r2.add_interface("eth0", addr("10.0.0.2"), 30).unwrap();
        r2.add_route("0.0.0.0/0".parse().unwrap(), NextHop::Via(addr("10.0.0.1")), "eth0");

        topo.add_device(r1).unwrap();
        topo.add_device(r2).unwrap();
        topo
    }

    #[test]
    fn test_routing_loop_detected() {
        let topo = looping_topology();
        let err = trace_path(&topo, addr("10.0.0.1"), addr("172.16.0.1")).unwrap_err();
        match err {
            XprobeError::Unreachable { path, .. } => {
                // r1 -> r2 -> back towards r1, detected on revisit.
                assert_eq!(names(&path), vec!["r1", "r2", "r1"]);
            }
            other => panic!("expected Unreachable, got {:?}", other),
        }
    }

    #[test]
    fn test_host_mid_path_rejected() {
        let mut topo = Topology::new();

        let mut r1 = Device::router("r1", RouterRole::Edge);
        r1.add_interface("eth0", addr("10.0.1.1"), 24).unwrap();
        // Bogus static route pointing at a host address.
        r1.add_route("172.16.0.0/16".parse().unwrap(), NextHop::Via(addr("10.0.1.2")), "eth0");
        topo.add_device(r1).unwrap();

        let h = Device::host("h", addr("10.0.1.2"), 24, addr("10.0.1.1")).unwrap();
        topo.add_device(h).unwrap();

        let err = trace_path(&topo, addr("10.0.1.1"), addr("172.16.0.1")).unwrap_err();
        match err {
            XprobeError::Unreachable { path, .. } => {
                assert_eq!(names(&path), vec!["r1", "h"]);
            }
            other => panic!("expected Unreachable, got {:?}", other),
        }
    }
}
