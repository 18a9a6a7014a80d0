use std::collections::{BTreeMap, HashSet};
use std::net::Ipv4Addr;

use crate::error::XprobeError;
use crate::net::blueprint;
use crate::net::{Device, DeviceKind};

/// One declared link between two devices. Display only; routing never
/// consults links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub a: String,
    pub b: String,
    pub medium: String,
    pub capacity: String,
}

/// The full device set plus declared links.
///
/// Owns every device (keyed by unique name); neighbor relations inside
/// devices refer back into this map by name. Built once, immutable during
/// queries, so a shared `&Topology` is safe for concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    devices: BTreeMap<String, Device>,
    links: Vec<Link>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed 15-device reference network (1 core, 2 aggregation,
    /// 4 edge, 8 hosts), validated.
    pub fn standard() -> Result<Self, XprobeError> {
        let topology = blueprint::build()?;
        topology.validate()?;
        Ok(topology)
    }

    pub fn add_device(&mut self, device: Device) -> Result<(), XprobeError> {
        if self.devices.contains_key(device.name()) {
            return Err(XprobeError::InvalidTopology(format!(
                "duplicate device name {}",
                device.name()
            )));
        }
        self.devices.insert(device.name().to_string(), device);
        Ok(())
    }

    pub fn add_link(
        &mut self,
        a: impl Into<String>,
        b: impl Into<String>,
        medium: impl Into<String>,
        capacity: impl Into<String>,
    ) {
        self.links.push(Link {
            a: a.into(),
            b: b.into(),
            medium: medium.into(),
            capacity: capacity.into(),
        });
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.get(name)
    }

    pub fn device_mut(&mut self, name: &str) -> Option<&mut Device> {
        self.devices.get_mut(name)
    }

    /// Devices in name order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Find the device that owns `addr` as an interface address.
    ///
    /// Exact-address ownership, not subnet membership: the owner of a
    /// gateway address is the router, never a host on that subnet.
    pub fn device_by_address(&self, addr: Ipv4Addr) -> Result<&Device, XprobeError> {
        self.devices
            .values()
            .find(|d| d.owns_address(addr))
            .ok_or(XprobeError::AddressNotFound(addr))
    }

    /// Construction invariants: unique interface addresses across the
    /// topology, host gateways owned by some device, route egress
    /// interfaces present on their device, neighbor and link endpoints
    /// resolvable.
    pub fn validate(&self) -> Result<(), XprobeError> {
        let mut seen: HashSet<Ipv4Addr> = HashSet::new();
        for device in self.devices.values() {
            for iface in device.interfaces() {
                if !seen.insert(iface.address()) {
                    return Err(XprobeError::InvalidTopology(format!(
                        "address {} assigned to more than one device",
                        iface.address()
                    )));
                }
            }
        }

        for device in self.devices.values() {
            if let DeviceKind::Host { gateway, .. } = device.kind() {
                if self.device_by_address(*gateway).is_err() {
                    return Err(XprobeError::InvalidTopology(format!(
                        "host {} gateway {} owned by no device",
                        device.name(),
                        gateway
                    )));
                }
            }

            for route in device.routes() {
                if device.interface(&route.interface).is_none() {
                    return Err(XprobeError::InvalidTopology(format!(
                        "{}: route to {} egresses unknown interface {}",
                        device.name(),
                        route.destination,
                        route.interface
                    )));
                }
            }

            for (iface, peer) in device.neighbors() {
                if device.interface(iface).is_none() {
                    return Err(XprobeError::InvalidTopology(format!(
                        "{}: neighbor via unknown interface {}",
                        device.name(),
                        iface
                    )));
                }
                if !self.devices.contains_key(peer) {
                    return Err(XprobeError::InvalidTopology(format!(
                        "{}: neighbor {} does not exist",
                        device.name(),
                        peer
                    )));
                }
            }
        }

        for link in &self.links {
            for end in [&link.a, &link.b] {
                if !self.devices.contains_key(end) {
                    return Err(XprobeError::InvalidTopology(format!(
                        "link endpoint {} does not exist",
                        end
                    )));
                }
            }
        }

        Ok(())
    }
}
