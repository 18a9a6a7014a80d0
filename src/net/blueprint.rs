//! Declarative specification of the fixed reference network.
//!
//! Static data tables only; `build` materializes them into a [`Topology`].
//! Keeping the addressing plan out of the engine means the model code has
//! no knowledge of any particular network.

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

use crate::error::XprobeError;
use crate::net::{Device, NextHop, RouterRole, Topology};

struct HostSpec {
    name: &'static str,
    address: &'static str,
    prefix: u8,
    gateway: &'static str,
}

struct IfaceSpec {
    name: &'static str,
    address: &'static str,
    prefix: u8,
}

struct RouterSpec {
    name: &'static str,
    role: RouterRole,
    interfaces: &'static [IfaceSpec],
}

struct RouteSpec {
    device: &'static str,
    destination: &'static str,
    prefix: u8,
    next_hop: &'static str,
    interface: &'static str,
}

struct NeighborSpec {
    device: &'static str,
    interface: &'static str,
    peer: &'static str,
}

struct LinkSpec {
    a: &'static str,
    b: &'static str,
    medium: &'static str,
    capacity: &'static str,
}

const HOSTS: &[HostSpec] = &[
    HostSpec { name: "h1", address: "192.168.1.2", prefix: 28, gateway: "192.168.1.1" },
    HostSpec { name: "h2", address: "192.168.1.3", prefix: 28, gateway: "192.168.1.1" },
    HostSpec { name: "h3", address: "192.168.2.2", prefix: 28, gateway: "192.168.2.1" },
    HostSpec { name: "h4", address: "192.168.2.3", prefix: 28, gateway: "192.168.2.1" },
    HostSpec { name: "h5", address: "192.168.3.2", prefix: 27, gateway: "192.168.3.1" },
    HostSpec { name: "h6", address: "192.168.3.3", prefix: 27, gateway: "192.168.3.1" },
    HostSpec { name: "h7", address: "192.168.4.2", prefix: 27, gateway: "192.168.4.1" },
    HostSpec { name: "h8", address: "192.168.4.3", prefix: 27, gateway: "192.168.4.1" },
];

const ROUTERS: &[RouterSpec] = &[
    RouterSpec {
        name: "e1",
        role: RouterRole::Edge,
        interfaces: &[
            IfaceSpec { name: "eth0", address: "192.168.1.1", prefix: 28 },
            IfaceSpec { name: "eth1", address: "192.168.11.2", prefix: 30 },
        ],
    },
    RouterSpec {
        name: "e2",
        role: RouterRole::Edge,
        interfaces: &[
            IfaceSpec { name: "eth0", address: "192.168.2.1", prefix: 28 },
            IfaceSpec { name: "eth1", address: "192.168.12.2", prefix: 30 },
        ],
    },
    RouterSpec {
        name: "e3",
        role: RouterRole::Edge,
        interfaces: &[
            IfaceSpec { name: "eth0", address: "192.168.3.1", prefix: 27 },
            IfaceSpec { name: "eth1", address: "192.168.13.2", prefix: 30 },
        ],
    },
    RouterSpec {
        name: "e4",
        role: RouterRole::Edge,
        interfaces: &[
            IfaceSpec { name: "eth0", address: "192.168.4.1", prefix: 27 },
            IfaceSpec { name: "eth1", address: "192.168.14.2", prefix: 30 },
        ],
    },
    RouterSpec {
        name: "a1",
        role: RouterRole::Aggregation,
        interfaces: &[
            IfaceSpec { name: "eth0", address: "192.168.11.1", prefix: 30 },
            IfaceSpec { name: "eth1", address: "192.168.12.1", prefix: 30 },
            IfaceSpec { name: "eth2", address: "192.168.21.2", prefix: 30 },
        ],
    },
    RouterSpec {
        name: "a2",
        role: RouterRole::Aggregation,
        interfaces: &[
            IfaceSpec { name: "eth0", address: "192.168.13.1", prefix: 30 },
            IfaceSpec { name: "eth1", address: "192.168.14.1", prefix: 30 },
            IfaceSpec { name: "eth2", address: "192.168.22.2", prefix: 30 },
        ],
    },
    RouterSpec {
        name: "c1",
        role: RouterRole::Core,
        interfaces: &[
            IfaceSpec { name: "eth0", address: "192.168.21.1", prefix: 30 },
            IfaceSpec { name: "eth1", address: "192.168.22.1", prefix: 30 },
        ],
    },
];

const ROUTES: &[RouteSpec] = &[
    // Edge routers: default route up to their aggregation router.
    RouteSpec { device: "e1", destination: "0.0.0.0", prefix: 0, next_hop: "192.168.11.1", interface: "eth1" },
    RouteSpec { device: "e2", destination: "0.0.0.0", prefix: 0, next_hop: "192.168.12.1", interface: "eth1" },
    RouteSpec { device: "e3", destination: "0.0.0.0", prefix: 0, next_hop: "192.168.13.1", interface: "eth1" },
    RouteSpec { device: "e4", destination: "0.0.0.0", prefix: 0, next_hop: "192.168.14.1", interface: "eth1" },
    // a1: local host subnets down via the edge routers.
    RouteSpec { device: "a1", destination: "192.168.1.0", prefix: 28, next_hop: "192.168.11.2", interface: "eth0" },
    RouteSpec { device: "a1", destination: "192.168.2.0", prefix: 28, next_hop: "192.168.12.2", interface: "eth1" },
    // a1: the far side via the core.
    RouteSpec { device: "a1", destination: "192.168.3.0", prefix: 27, next_hop: "192.168.21.1", interface: "eth2" },
    RouteSpec { device: "a1", destination: "192.168.4.0", prefix: 27, next_hop: "192.168.21.1", interface: "eth2" },
    RouteSpec { device: "a1", destination: "192.168.13.0", prefix: 30, next_hop: "192.168.21.1", interface: "eth2" },
    RouteSpec { device: "a1", destination: "192.168.14.0", prefix: 30, next_hop: "192.168.21.1", interface: "eth2" },
    RouteSpec { device: "a1", destination: "192.168.22.0", prefix: 30, next_hop: "192.168.21.1", interface: "eth2" },
    // a2: local host subnets down via the edge routers.
    RouteSpec { device: "a2", destination: "192.168.3.0", prefix: 27, next_hop: "192.168.13.2", interface: "eth0" },
    RouteSpec { device: "a2", destination: "192.168.4.0", prefix: 27, next_hop: "192.168.14.2", interface: "eth1" },
    // a2: the far side via the core.
    RouteSpec { device: "a2", destination: "192.168.1.0", prefix: 28, next_hop: "192.168.22.1", interface: "eth2" },
    RouteSpec { device: "a2", destination: "192.168.2.0", prefix: 28, next_hop: "192.168.22.1", interface: "eth2" },
    RouteSpec { device: "a2", destination: "192.168.11.0", prefix: 30, next_hop: "192.168.22.1", interface: "eth2" },
    RouteSpec { device: "a2", destination: "192.168.12.0", prefix: 30, next_hop: "192.168.22.1", interface: "eth2" },
    RouteSpec { device: "a2", destination: "192.168.21.0", prefix: 30, next_hop: "192.168.22.1", interface: "eth2" },
    // Core: everything behind a1.
    RouteSpec { device: "c1", destination: "192.168.1.0", prefix: 28, next_hop: "192.168.21.2", interface: "eth0" },
    RouteSpec { device: "c1", destination: "192.168.2.0", prefix: 28, next_hop: "192.168.21.2", interface: "eth0" },
    RouteSpec { device: "c1", destination: "192.168.11.0", prefix: 30, next_hop: "192.168.21.2", interface: "eth0" },
    RouteSpec { device: "c1", destination: "192.168.12.0", prefix: 30, next_hop: "192.168.21.2", interface: "eth0" },
    // Core: everything behind a2.
    RouteSpec { device: "c1", destination: "192.168.3.0", prefix: 27, next_hop: "192.168.22.2", interface: "eth1" },
    RouteSpec { device: "c1", destination: "192.168.4.0", prefix: 27, next_hop: "192.168.22.2", interface: "eth1" },
    RouteSpec { device: "c1", destination: "192.168.13.0", prefix: 30, next_hop: "192.168.22.2", interface: "eth1" },
    RouteSpec { device: "c1", destination: "192.168.14.0", prefix: 30, next_hop: "192.168.22.2", interface: "eth1" },
];

const NEIGHBORS: &[NeighborSpec] = &[
    NeighborSpec { device: "c1", interface: "eth0", peer: "a1" },
    NeighborSpec { device: "c1", interface: "eth1", peer: "a2" },
    NeighborSpec { device: "a1", interface: "eth0", peer: "e1" },
    NeighborSpec { device: "a1", interface: "eth1", peer: "e2" },
    NeighborSpec { device: "a1", interface: "eth2", peer: "c1" },
    NeighborSpec { device: "a2", interface: "eth0", peer: "e3" },
    NeighborSpec { device: "a2", interface: "eth1", peer: "e4" },
    NeighborSpec { device: "a2", interface: "eth2", peer: "c1" },
    NeighborSpec { device: "e1", interface: "eth1", peer: "a1" },
    NeighborSpec { device: "e2", interface: "eth1", peer: "a1" },
    NeighborSpec { device: "e3", interface: "eth1", peer: "a2" },
    NeighborSpec { device: "e4", interface: "eth1", peer: "a2" },
];

const LINKS: &[LinkSpec] = &[
    LinkSpec { a: "c1", b: "a1", medium: "Optical fiber", capacity: "10 Gbps" },
    LinkSpec { a: "c1", b: "a2", medium: "Optical fiber", capacity: "10 Gbps" },
    LinkSpec { a: "a1", b: "e1", medium: "Cat6 twisted pair", capacity: "1 Gbps" },
    LinkSpec { a: "a1", b: "e2", medium: "Cat6 twisted pair", capacity: "1 Gbps" },
    LinkSpec { a: "a2", b: "e3", medium: "Cat6 twisted pair", capacity: "1 Gbps" },
    LinkSpec { a: "a2", b: "e4", medium: "Cat6 twisted pair", capacity: "1 Gbps" },
    LinkSpec { a: "e1", b: "h1", medium: "Cat5e twisted pair", capacity: "100 Mbps" },
    LinkSpec { a: "e1", b: "h2", medium: "Cat5e twisted pair", capacity: "100 Mbps" },
    LinkSpec { a: "e2", b: "h3", medium: "Cat5e twisted pair", capacity: "100 Mbps" },
    LinkSpec { a: "e2", b: "h4", medium: "Cat5e twisted pair", capacity: "100 Mbps" },
    LinkSpec { a: "e3", b: "h5", medium: "Cat5e twisted pair", capacity: "100 Mbps" },
    LinkSpec { a: "e3", b: "h6", medium: "Cat5e twisted pair", capacity: "100 Mbps" },
    LinkSpec { a: "e4", b: "h7", medium: "Cat5e twisted pair", capacity: "100 Mbps" },
    LinkSpec { a: "e4", b: "h8", medium: "Cat5e twisted pair", capacity: "100 Mbps" },
];

fn parse_addr(s: &str) -> Result<Ipv4Addr, XprobeError> {
    s.parse()
        .map_err(|_| XprobeError::InvalidTopology(format!("bad address literal {}", s)))
}

fn parse_net(addr: &str, prefix: u8) -> Result<Ipv4Network, XprobeError> {
    Ipv4Network::new(parse_addr(addr)?, prefix)
        .map_err(|e| XprobeError::InvalidTopology(format!("{}/{}: {}", addr, prefix, e)))
}

/// Materialize the blueprint tables into a topology.
pub(crate) fn build() -> Result<Topology, XprobeError> {
    let mut topology = Topology::new();

    for spec in HOSTS {
        topology.add_device(Device::host(
            spec.name,
            parse_addr(spec.address)?,
            spec.prefix,
            parse_addr(spec.gateway)?,
        )?)?;
    }

    for spec in ROUTERS {
        let mut router = Device::router(spec.name, spec.role);
        for iface in spec.interfaces {
            router.add_interface(iface.name, parse_addr(iface.address)?, iface.prefix)?;
        }
        topology.add_device(router)?;
    }

    for spec in ROUTES {
        let destination = parse_net(spec.destination, spec.prefix)?;
        let next_hop = NextHop::Via(parse_addr(spec.next_hop)?);
        let device = topology.device_mut(spec.device).ok_or_else(|| {
            XprobeError::InvalidTopology(format!("route for unknown device {}", spec.device))
        })?;
        device.add_route(destination, next_hop, spec.interface);
    }

    for spec in NEIGHBORS {
        let device = topology.device_mut(spec.device).ok_or_else(|| {
            XprobeError::InvalidTopology(format!("neighbor for unknown device {}", spec.device))
        })?;
        device.add_neighbor(spec.interface, spec.peer);
    }

    for spec in LINKS {
        topology.add_link(spec.a, spec.b, spec.medium, spec.capacity);
    }

    Ok(topology)
}
