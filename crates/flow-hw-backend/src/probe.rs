//! Capability probe interface and probed metadata.

use crate::config::DebugMode;
use crate::error::TransportError;
use flow_hw_types::{Capability, Subsystem, Version};
use std::collections::BTreeMap;
use std::fmt;

/// Capability probe implemented by the device handle.
///
/// Every method is queried once while the backend attaches; the answers are
/// cached on the backend and never re-read.
pub trait DeviceProbe {
    /// Returns true if the device implements the subsystem.
    fn is_present(&self, subsystem: Subsystem) -> bool;

    /// Returns the module revision of a present subsystem.
    fn version(&self, subsystem: Subsystem) -> Version;

    /// Returns a capacity counter, or `None` if the device cannot report it.
    fn capacity(&self, capability: Capability) -> Option<u32>;

    /// Switches the device's own debug tracing.
    fn set_debug_mode(&self, mode: DebugMode) -> Result<(), TransportError> {
        let _ = mode;
        Ok(())
    }
}

/// Probed capacity counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capacities {
    counts: BTreeMap<Capability, u32>,
}

impl Capacities {
    /// Creates an empty counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a counter, or zero if it was never probed.
    pub fn get(&self, capability: Capability) -> u32 {
        self.counts.get(&capability).copied().unwrap_or(0)
    }

    /// Records a counter.
    pub fn insert(&mut self, capability: Capability, count: u32) {
        self.counts.insert(capability, count);
    }

    /// Returns true if the counter was probed.
    pub fn contains(&self, capability: Capability) -> bool {
        self.counts.contains_key(&capability)
    }

    /// Returns the product of two counters, or `None` on overflow.
    pub fn product(&self, a: Capability, b: Capability) -> Option<u32> {
        self.get(a).checked_mul(self.get(b))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, u32)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }
}

impl FromIterator<(Capability, u32)> for Capacities {
    fn from_iter<I: IntoIterator<Item = (Capability, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Capacities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (capability, count) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", capability, count)?;
            first = false;
        }
        Ok(())
    }
}

/// NIC-wide attributes probed at attach time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NicAttributes {
    pub num_phy_ports: u32,
    pub num_rx_ports: u32,
    pub max_categories: u32,
    pub max_queues: u32,
}

impl NicAttributes {
    /// Reads the NIC-wide counters from the device. Missing counters are
    /// recorded as zero.
    pub fn probe<D: DeviceProbe + ?Sized>(device: &D) -> Self {
        let count = |c| device.capacity(c).unwrap_or(0);
        Self {
            num_phy_ports: count(Capability::PhyPorts),
            num_rx_ports: count(Capability::RxPorts),
            max_categories: count(Capability::Categories),
            max_queues: count(Capability::Queues),
        }
    }
}
