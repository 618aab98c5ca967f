use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// A host found during a discovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Host {
    pub address: Ipv4Addr,
    pub hardware: Option<MacAddr>,
    /// `true` when the host answered a direct request, `false` when it was only
    /// seen in the cache after the sweep.
    pub responded: bool,
}

impl Host {
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            hardware: None,
            responded: false,
        }
    }

    pub fn with_hardware(mut self, hardware: MacAddr) -> Self {
        self.hardware = Some(hardware);
        self
    }

    pub fn responded(mut self) -> Self {
        self.responded = true;
        self
    }
}

/// Merges the results of two discovery passes.
///
/// The output is deduplicated by address and sorted ascending. When both
/// passes report the same address, the `later` entry wins its hardware value
/// (unless it has none) and the `responded` flags are combined.
pub fn merge_passes(earlier: Vec<Host>, later: Vec<Host>) -> Vec<Host> {
    let mut merged: BTreeMap<Ipv4Addr, Host> = BTreeMap::new();

    for host in earlier {
        merged.insert(host.address, host);
    }

    for host in later {
        merged
            .entry(host.address)
            .and_modify(|existing| {
                if host.hardware.is_some() {
                    existing.hardware = host.hardware;
                }
                existing.responded |= host.responded;
            })
            .or_insert(host);
    }

    merged.into_values().collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
