//! Read-only views of IPv4 → MAC mappings.
//!
//! Two sources are consulted: replies snooped from the datalink channel
//! ([`NeighborTable`]) and the operating system's own ARP cache
//! ([`SystemArpCache`]). Neither triggers traffic.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, MutexGuard};

use pnet::util::MacAddr;
use tracing::{debug, trace};

/// Looks up the hardware address currently mapped to an IPv4 address.
///
/// Implementations return `None` for unknown or incomplete entries and never
/// fail; read errors are logged and reported as a miss.
pub trait ArpCache {
    fn lookup(&self, addr: Ipv4Addr) -> Option<MacAddr>;
}

impl ArpCache for HashMap<Ipv4Addr, MacAddr> {
    fn lookup(&self, addr: Ipv4Addr) -> Option<MacAddr> {
        self.get(&addr).copied()
    }
}

/// Mappings learned from inbound ARP replies, shared with the capture thread.
#[derive(Debug, Clone, Default)]
pub struct NeighborTable {
    entries: Arc<Mutex<HashMap<Ipv4Addr, MacAddr>>>,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a mapping, replacing any older one for the same address.
    pub fn record(&self, addr: Ipv4Addr, mac: MacAddr) {
        match self.entries().insert(addr, mac) {
            Some(previous) if previous != mac => debug!("{addr} moved from {previous} to {mac}"),
            _ => {}
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Ipv4Addr, MacAddr>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArpCache for NeighborTable {
    fn lookup(&self, addr: Ipv4Addr) -> Option<MacAddr> {
        self.entries().get(&addr).copied()
    }
}

/// The operating system's ARP cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemArpCache;

impl ArpCache for SystemArpCache {
    fn lookup(&self, addr: Ipv4Addr) -> Option<MacAddr> {
        match os_impl::read_table() {
            Ok(table) => table.get(&addr).copied(),
            Err(e) => {
                debug!("Failed to read the system ARP cache: {e:#}");
                None
            }
        }
    }
}

/// Snooped replies first, then the system cache.
#[derive(Debug, Clone)]
pub struct NeighborCache {
    snooped: NeighborTable,
    system: SystemArpCache,
}

impl NeighborCache {
    pub fn new(snooped: NeighborTable) -> Self {
        Self {
            snooped,
            system: SystemArpCache,
        }
    }
}

impl ArpCache for NeighborCache {
    fn lookup(&self, addr: Ipv4Addr) -> Option<MacAddr> {
        let found = self.snooped.lookup(addr).or_else(|| self.system.lookup(addr));
        trace!("cache lookup {addr} -> {found:?}");
        found
    }
}

const ATF_COM: u32 = 0x2;

/// Parses the contents of `/proc/net/arp`, keeping completed entries only.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_net_arp(contents: &str) -> HashMap<Ipv4Addr, MacAddr> {
    contents
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [ip, _hw_type, flags, mac, ..] = fields.as_slice() else {
                return None;
            };
            let flags = u32::from_str_radix(flags.trim_start_matches("0x"), 16).ok()?;
            if flags & ATF_COM == 0 {
                return None;
            }
            let mac: MacAddr = mac.parse().ok()?;
            if mac == MacAddr::zero() {
                return None;
            }
            Some((ip.parse().ok()?, mac))
        })
        .collect()
}

/// Parses BSD-style `arp -an` output.
#[cfg_attr(target_os = "linux", allow(dead_code))]
fn parse_arp_an(output: &str) -> HashMap<Ipv4Addr, MacAddr> {
    output
        .lines()
        .filter_map(|line| {
            let ip_start = line.find('(')? + 1;
            let ip_end = ip_start + line[ip_start..].find(')')?;
            let ip: Ipv4Addr = line[ip_start..ip_end].parse().ok()?;
            let mut rest = line[ip_end..].split_whitespace();
            rest.find(|token| *token == "at")?;
            let mac: MacAddr = rest.next()?.parse().ok()?;
            Some((ip, mac))
        })
        .collect()
}

#[cfg(target_os = "linux")]
mod os_impl {
    use super::*;
    use anyhow::Context;

    const PROC_NET_ARP: &str = "/proc/net/arp";

    pub fn read_table() -> anyhow::Result<HashMap<Ipv4Addr, MacAddr>> {
        let contents = std::fs::read_to_string(PROC_NET_ARP)
            .with_context(|| format!("reading {PROC_NET_ARP}"))?;
        Ok(parse_proc_net_arp(&contents))
    }
}

#[cfg(not(target_os = "linux"))]
mod os_impl {
    use super::*;
    use anyhow::Context;
    use std::process::Command;

    pub fn read_table() -> anyhow::Result<HashMap<Ipv4Addr, MacAddr>> {
        let output = Command::new("arp").arg("-an").output().context("running arp -an")?;
        anyhow::ensure!(output.status.success(), "arp -an exited with {}", output.status);
        Ok(parse_arp_an(&String::from_utf8_lossy(&output.stdout)))
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
