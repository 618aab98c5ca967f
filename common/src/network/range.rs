use std::fmt;
use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;
use tracing::debug;

use crate::error::{EngineError, Result};

const LOWEST_HOST: u8 = 1;
const HIGHEST_HOST: u8 = 254;

/// A run of candidate addresses that differ only in the last octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    base: Ipv4Addr,
    first: u8,
    last: u8,
}

impl AddressRange {
    /// Builds a range over `base` with the last octet running `first..=last`.
    ///
    /// The last octet of `base` is cleared. Fails with
    /// [`EngineError::InvalidRange`] unless `1 <= first <= last <= 254`.
    pub fn new(base: Ipv4Addr, first: u8, last: u8) -> Result<Self> {
        if first < LOWEST_HOST || first > last || last > HIGHEST_HOST {
            return Err(EngineError::InvalidRange { first, last });
        }
        let [a, b, c, _] = base.octets();
        Ok(Self {
            base: Ipv4Addr::new(a, b, c, 0),
            first,
            last,
        })
    }

    /// Derives the range from the local interface's address and prefix.
    ///
    /// Subnets wider than a /24 are clamped to the /24 holding the local
    /// address; narrower ones exclude their network and broadcast addresses.
    pub fn from_network(net: Ipv4Network) -> Result<Self> {
        if net.prefix() < 24 {
            debug!("{net} is wider than a /24, limiting the walk to the local /24");
            return Self::new(net.ip(), LOWEST_HOST, HIGHEST_HOST);
        }

        let network_octet: u8 = net.network().octets()[3];
        let broadcast_octet: u8 = net.broadcast().octets()[3];

        let first = network_octet.saturating_add(1).max(LOWEST_HOST);
        let last = broadcast_octet.saturating_sub(1).min(HIGHEST_HOST);

        Self::new(net.ip(), first, last)
    }

    /// Returns a copy with new bounds, re-checking the invariant.
    pub fn with_bounds(&self, first: u8, last: u8) -> Result<Self> {
        Self::new(self.base, first, last)
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn first(&self) -> u8 {
        self.first
    }

    pub fn last(&self) -> u8 {
        self.last
    }

    pub fn len(&self) -> usize {
        usize::from(self.last - self.first) + 1
    }

    /// The candidate address for a given last octet.
    pub fn candidate(&self, offset: u8) -> Ipv4Addr {
        let [a, b, c, _] = self.base.octets();
        Ipv4Addr::new(a, b, c, offset)
    }

    /// Iterates over every candidate in ascending order.
    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        (self.first..=self.last).map(|offset| self.candidate(offset))
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.candidate(self.first), self.last)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
