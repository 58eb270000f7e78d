//! Network interfaces supplied on the command line

use crate::error::{ProvisionError, Result};
use satflow_gateway::HostInterface;

/// Interface position. Each slot has a fixed purpose: public network,
/// in-guest NFS storage, database replication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NicSlot {
    Primary,
    Secondary,
    Third,
}

impl NicSlot {
    pub const ALL: [NicSlot; 3] = [NicSlot::Primary, NicSlot::Secondary, NicSlot::Third];

    pub fn ordinal(&self) -> usize {
        match self {
            NicSlot::Primary => 1,
            NicSlot::Secondary => 2,
            NicSlot::Third => 3,
        }
    }

    /// Interface identifier on the host
    pub fn identifier(&self) -> &'static str {
        match self {
            NicSlot::Primary => "eth0",
            NicSlot::Secondary => "eth1",
            NicSlot::Third => "eth2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NicSlot::Primary => "primary",
            NicSlot::Secondary => "secondary",
            NicSlot::Third => "third",
        }
    }
}

/// Interface settings exactly as given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicInput {
    pub ip: Option<String>,
    pub mask: Option<String>,
    pub gateway: Option<String>,
    pub mac: Option<String>,
}

/// An interface after its subnet has been ensured and resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNic {
    pub slot: NicSlot,
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub subnet_id: Option<String>,
}

impl ResolvedNic {
    /// An interface is usable for host creation only with IP, MAC and subnet id
    pub fn as_complete(&self) -> Option<HostInterface> {
        Some(HostInterface {
            ip: self.ip.clone()?,
            mac: self.mac.clone()?,
            subnet_id: self.subnet_id.clone()?,
        })
    }

    fn has_ip(&self) -> bool {
        self.ip.is_some()
    }
}

/// Which `hammer host create` form applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceLayout {
    One(HostInterface),
    Two(HostInterface, HostInterface),
    Three(HostInterface, HostInterface, HostInterface),
}

impl InterfaceLayout {
    /// Pick the form from the contiguously filled interfaces.
    ///
    /// - one: primary complete, no other IP
    /// - two: primary and secondary complete, no third IP
    /// - three: all complete
    ///
    /// Anything else has no form: a gap such as interfaces 1 and 3 without
    /// 2, or an interface missing its IP, MAC or subnet id.
    pub fn select(nics: &[ResolvedNic; 3]) -> Result<Self> {
        let [first, second, third] = nics;

        match (first.as_complete(), second.as_complete(), third.as_complete()) {
            (Some(a), _, _) if !second.has_ip() && !third.has_ip() => Ok(InterfaceLayout::One(a)),
            (Some(a), Some(b), _) if !third.has_ip() => Ok(InterfaceLayout::Two(a, b)),
            (Some(a), Some(b), Some(c)) => Ok(InterfaceLayout::Three(a, b, c)),
            _ => Err(ProvisionError::InterfaceLayout(describe(nics))),
        }
    }

    pub fn primary(&self) -> &HostInterface {
        match self {
            InterfaceLayout::One(a) | InterfaceLayout::Two(a, _) | InterfaceLayout::Three(a, _, _) => a,
        }
    }

    /// Interfaces beyond the primary with their identifiers
    pub fn extra_interfaces(&self) -> Vec<(String, HostInterface)> {
        let extra: Vec<&HostInterface> = match self {
            InterfaceLayout::One(_) => Vec::new(),
            InterfaceLayout::Two(_, b) => vec![b],
            InterfaceLayout::Three(_, b, c) => vec![b, c],
        };

        extra
            .into_iter()
            .zip(&NicSlot::ALL[1..])
            .map(|(nic, slot)| (slot.identifier().to_string(), nic.clone()))
            .collect()
    }

    pub fn interface_count(&self) -> usize {
        match self {
            InterfaceLayout::One(..) => 1,
            InterfaceLayout::Two(..) => 2,
            InterfaceLayout::Three(..) => 3,
        }
    }
}

fn describe(nics: &[ResolvedNic; 3]) -> String {
    nics.iter()
        .map(|nic| {
            let missing: Vec<&str> = [
                ("ip", nic.ip.is_none()),
                ("mac", nic.mac.is_none()),
                ("subnet id", nic.subnet_id.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();

            if missing.is_empty() {
                format!("{} complete", nic.slot.label())
            } else {
                format!("{} missing {}", nic.slot.label(), missing.join("/"))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
