//! Device, interface and topology model.

mod blueprint;
mod device;
mod interface;
mod topology;

pub use device::{Device, DeviceKind, NextHop, RouteDecision, RouteEntry, RouterRole};
pub use interface::Interface;
pub use topology::{Link, Topology};
