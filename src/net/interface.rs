use std::fmt;
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

use crate::error::XprobeError;

/// A network interface: a name plus an address with its prefix length.
///
/// The `Ipv4Network` keeps the interface address itself, so the address is
/// inside its own subnet by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    name: String,
    network: Ipv4Network,
}

impl Interface {
    pub fn new(name: impl Into<String>, address: Ipv4Addr, prefix: u8) -> Result<Self, XprobeError> {
        let network = Ipv4Network::new(address, prefix)
            .map_err(|e| XprobeError::InvalidTopology(format!("{}/{}: {}", address, prefix, e)))?;
        Ok(Self {
            name: name.into(),
            network,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The address assigned to this interface.
    pub fn address(&self) -> Ipv4Addr {
        self.network.ip()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    /// The masked network address of the containing subnet.
    pub fn subnet(&self) -> Ipv4Addr {
        self.network.network()
    }

    /// Subnet membership test (not exact-address equality).
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.network.contains(addr)
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network.ip(), self.network.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_address_inside_own_subnet() {
        let iface = Interface::new("eth0", addr("192.168.1.1"), 28).unwrap();
        assert!(iface.contains(iface.address()));
        assert_eq!(iface.subnet(), addr("192.168.1.0"));
        assert_eq!(iface.prefix(), 28);
    }

    #[test]
    fn test_containment() {
        let iface = Interface::new("eth0", addr("192.168.1.1"), 28);
        let iface = iface.unwrap();

        // /28 covers .0 - .15
        assert!(iface.contains(addr("192.168.1.2")));
        assert!(iface.contains(addr("192.168.1.15")));
        assert!(!iface.contains(addr("192.168.1.16")));
        assert!(!iface.contains(addr("192.168.2.2")));
    }

    #[test]
    fn test_point_to_point_slash_30() {
        let iface = Interface::new("eth1", addr("192.168.11.2"), 30).unwrap();
        assert!(iface.contains(addr("192.168.11.1")));
        assert!(!iface.contains(addr("192.168.11.5")));
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(Interface::new("eth0", addr("10.0.0.1"), 33).is_err());
    }

    #[test]
    fn test_display() {
        let iface = Interface::new("eth0", addr("192.168.3.1"), 27).unwrap();
        assert_eq!(iface.to_string(), "192.168.3.1/27");
    }
}
