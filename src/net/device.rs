use std::fmt;
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

use crate::error::XprobeError;
use crate::net::Interface;

/// Tier of a router in the three-level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RouterRole {
    Core,
    Aggregation,
    Edge,
}

impl fmt::Display for RouterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterRole::Core => write!(f, "Core"),
            RouterRole::Aggregation => write!(f, "Aggregation"),
            RouterRole::Edge => write!(f, "Edge"),
        }
    }
}

/// Discriminant for the two device flavors.
///
/// Hosts carry their default gateway and an activity flag; routers carry
/// their tier. Behavior differences (gateway-first tracing, probe refusal
/// for inactive hosts) switch on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceKind {
    Host { gateway: Ipv4Addr, active: bool },
    Router(RouterRole),
}

/// Where a routed packet goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextHop {
    /// Destination is on one of the resolving device's own subnets.
    Direct,
    Via(Ipv4Addr),
}

impl fmt::Display for NextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextHop::Direct => write!(f, "directly connected"),
            NextHop::Via(addr) => write!(f, "{}", addr),
        }
    }
}

/// One static routing table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub destination: Ipv4Network,
    pub next_hop: NextHop,
    pub interface: String,
}

/// Outcome of route resolution for a destination address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub next_hop: NextHop,
    pub interface: String,
}

/// A named node: interfaces, a static routing table, and non-owning links
/// to neighbor devices (by name; the topology owns all devices).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    name: String,
    kind: DeviceKind,
    interfaces: Vec<Interface>,
    routes: Vec<RouteEntry>,
    neighbors: Vec<(String, String)>,
}

impl Device {
    pub fn host(
        name: impl Into<String>,
        address: Ipv4Addr,
        prefix: u8,
        gateway: Ipv4Addr,
    ) -> Result<Self, XprobeError> {
        Ok(Self {
            name: name.into(),
            kind: DeviceKind::Host {
                gateway,
                active: true,
            },
            interfaces: vec![Interface::new("eth0", address, prefix)?],
            routes: Vec::new(),
            neighbors: Vec::new(),
        })
    }

    pub fn router(name: impl Into<String>, role: RouterRole) -> Self {
        Self {
            name: name.into(),
            kind: DeviceKind::Router(role),
            interfaces: Vec::new(),
            routes: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    pub fn add_interface(
        &mut self,
        name: impl Into<String>,
        address: Ipv4Addr,
        prefix: u8,
    ) -> Result<(), XprobeError> {
        self.interfaces.push(Interface::new(name, address, prefix)?);
        Ok(())
    }

    /// Append a static route. Insertion order is the tie-break for
    /// equal-length prefixes, nothing more.
    pub fn add_route(
        &mut self,
        destination: Ipv4Network,
        next_hop: NextHop,
        interface: impl Into<String>,
    ) {
        self.routes.push(RouteEntry {
            destination,
            next_hop,
            interface: interface.into(),
        });
    }

    /// Record a neighbor reachable through `interface`, by device name.
    pub fn add_neighbor(&mut self, interface: impl Into<String>, device: impl Into<String>) {
        self.neighbors.push((interface.into(), device.into()));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &DeviceKind {
        &self.kind
    }

    pub fn is_host(&self) -> bool {
        matches!(self.kind, DeviceKind::Host { .. })
    }

    /// Host gateway; `None` for routers.
    pub fn gateway(&self) -> Option<Ipv4Addr> {
        match self.kind {
            DeviceKind::Host { gateway, .. } => Some(gateway),
            DeviceKind::Router(_) => None,
        }
    }

    /// Routers are always active; hosts carry a flag.
    pub fn is_active(&self) -> bool {
        match self.kind {
            DeviceKind::Host { active, .. } => active,
            DeviceKind::Router(_) => true,
        }
    }

    pub fn set_active(&mut self, value: bool) {
        if let DeviceKind::Host { ref mut active, .. } = self.kind {
            *active = value;
        }
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name() == name)
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn neighbors(&self) -> &[(String, String)] {
        &self.neighbors
    }

    /// Exact-address ownership test across all interfaces.
    pub fn owns_address(&self, addr: Ipv4Addr) -> bool {
        self.interfaces.iter().any(|i| i.address() == addr)
    }

    /// Resolve the next action for a destination address.
    ///
    /// The directly-connected check runs first, unconditionally: if the
    /// destination is inside any own-interface subnet the table is never
    /// consulted. Otherwise all table entries are scanned and the longest
    /// matching prefix wins, earliest-inserted on ties.
    pub fn resolve_route(&self, dest: Ipv4Addr) -> Result<RouteDecision, XprobeError> {
        for iface in &self.interfaces {
            if iface.contains(dest) {
                return Ok(RouteDecision {
                    next_hop: NextHop::Direct,
                    interface: iface.name().to_string(),
                });
            }
        }

        let mut best: Option<&RouteEntry> = None;
        for entry in &self.routes {
            if !entry.destination.contains(dest) {
                continue;
            }
            let better = match best {
                Some(current) => entry.destination.prefix() > current.destination.prefix(),
                None => true,
            };
            if better {
                best = Some(entry);
            }
        }

        match best {
            Some(entry) => Ok(RouteDecision {
                next_hop: entry.next_hop,
                interface: entry.interface.clone(),
            }),
            None => Err(XprobeError::NoRoute {
                device: self.name.clone(),
                dest,
            }),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DeviceKind::Host { .. } => write!(f, "Host {}", self.name),
            DeviceKind::Router(role) => write!(f, "Router-{} {}", role, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    fn net(s: &str) -> Ipv4Network {
        s.parse().unwrap()
    }

    fn edge_router() -> Device {
        let mut r = Device::router("e1", RouterRole::Edge);
        r.add_interface("eth0", addr("192.168.1.1"), 28).unwrap();
        r.add_interface("eth1", addr("192.168.11.2"), 30).unwrap();
        r.add_route(net("0.0.0.0/0"), NextHop::Via(addr("192.168.11.1")), "eth1");
        r
    }

    #[test]
    fn test_directly_connected_wins_over_table() {
        let mut r = edge_router();
        // Table entry that also covers the host subnet; must be ignored.
        r.add_route(net("192.168.1.0/28"), NextHop::Via(addr("192.168.11.1")), "eth1");

        let decision = r.resolve_route(addr("192.168.1.5")).unwrap();
        assert_eq!(decision.next_hop, NextHop::Direct);
        assert_eq!(decision.interface, "eth0");
    }

    #[test]
    fn test_default_route_matches_everything_else() {
        let r = edge_router();
        let decision = r.resolve_route(addr("192.168.4.3")).unwrap();
        assert_eq!(decision.next_hop, NextHop::Via(addr("192.168.11.1")));
        assert_eq!(decision.interface, "eth1");
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut r = Device::router("a1", RouterRole::Aggregation);
        r.add_interface("eth2", addr("192.168.21.2"), 30).unwrap();
        r.add_route(net("192.168.0.0/16"), NextHop::Via(addr("192.168.21.1")), "eth2");
        r.add_route(net("192.168.3.0/24"), NextHop::Via(addr("10.0.0.1")), "eth2");
        r.add_route(net("192.168.3.4/30"), NextHop::Via(addr("10.0.0.2")), "eth2");

        let decision = r.resolve_route(addr("192.168.3.5")).unwrap();
        assert_eq!(decision.next_hop, NextHop::Via(addr("10.0.0.2")));

        // Outside the /30 but inside the /24.
        let decision = r.resolve_route(addr("192.168.3.9")).unwrap();
        assert_eq!(decision.next_hop, NextHop::Via(addr("10.0.0.1")));
    }

    #[test]
    fn test_equal_prefix_tie_goes_to_first_inserted() {
        let mut r = Device::router("r", RouterRole::Core);
        r.add_interface("eth0", addr("10.0.0.1"), 30).unwrap();
        r.add_route(net("192.168.5.0/24"), NextHop::Via(addr("10.0.0.2")), "eth0");
        r.add_route(net("192.168.5.0/24"), NextHop::Via(addr("10.0.0.6")), "eth0");

        let decision = r.resolve_route(addr("192.168.5.7")).unwrap();
        assert_eq!(decision.next_hop, NextHop::Via(addr("10.0.0.2")));
    }

    #[test]
    fn test_no_route() {
        let mut r = Device::router("c1", RouterRole::Core);
        r.add_interface("eth0", addr("192.168.21.1"), 30).unwrap();
        r.add_route(net("192.168.1.0/28"), NextHop::Via(addr("192.168.21.2")), "eth0");

        let err = r.resolve_route(addr("10.9.9.9")).unwrap_err();
        assert_eq!(
            err,
            XprobeError::NoRoute {
                device: "c1".into(),
                dest: addr("10.9.9.9"),
            }
        );
    }

    #[test]
    fn test_host_has_gateway_and_activity() {
        let mut h = Device::host("h1", addr("192.168.1.2"), 28, addr("192.168.1.1")).unwrap();
        assert!(h.is_host());
        assert!(h.is_active());
        assert_eq!(h.gateway(), Some(addr("192.168.1.1")));
        assert_eq!(h.interfaces().len(), 1);

        h.set_active(false);
        assert!(!h.is_active());
    }

    #[test]
    fn test_owns_address_is_exact_match() {
        let r = edge_router();
        assert!(r.owns_address(addr("192.168.1.1")));
        // In subnet but not an interface address.
        assert!(!r.owns_address(addr("192.168.1.2")));
    }

    #[test]
    fn test_display() {
        assert_eq!(edge_router().to_string(), "Router-Edge e1");
        let h = Device::host("h3", addr("192.168.2.2"), 28, addr("192.168.2.1")).unwrap();
        assert_eq!(h.to_string(), "Host h3");
    }
}
