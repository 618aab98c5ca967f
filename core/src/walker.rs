//! The range walker: sweeps an [`AddressRange`] with ARP requests and
//! harvests responders from the neighbour cache.

use std::net::Ipv4Addr;
use std::time::Duration;

use arpscout_common::error::EngineError;
use arpscout_common::network::host::{self, Host};
use arpscout_common::network::range::AddressRange;
use arpscout_protocols::ArpFrame;
use pnet::util::MacAddr;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::link::{self, FrameSender};
use crate::neighbors::ArpCache;

pub const DEFAULT_INTER_REQUEST_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Pause after each candidate.
    pub inter_request_delay: Duration,
    /// Also emit a forged reply per candidate during the sweep.
    pub provoke: bool,
    pub sweep_pass: bool,
    pub confirm_pass: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            inter_request_delay: DEFAULT_INTER_REQUEST_DELAY,
            provoke: false,
            sweep_pass: true,
            confirm_pass: true,
        }
    }
}

pub struct RangeWalker<'a> {
    local_hw: MacAddr,
    local_ip: Ipv4Addr,
    options: DiscoveryOptions,
    link: &'a mut dyn FrameSender,
    cache: &'a dyn ArpCache,
    clock: &'a dyn Clock,
}

impl<'a> RangeWalker<'a> {
    pub fn new(
        local_hw: MacAddr,
        local_ip: Ipv4Addr,
        options: DiscoveryOptions,
        link: &'a mut dyn FrameSender,
        cache: &'a dyn ArpCache,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            local_hw,
            local_ip,
            options,
            link,
            cache,
            clock,
        }
    }

    /// Runs the enabled passes and merges them, ascending by address.
    pub fn walk(&mut self, range: &AddressRange) -> Vec<Host> {
        let swept: Vec<Host> = match self.options.sweep_pass {
            true => self.sweep(range),
            false => Vec::new(),
        };
        let confirmed: Vec<Host> = match self.options.confirm_pass {
            true => self.confirm(range),
            false => Vec::new(),
        };
        host::merge_passes(swept, confirmed)
    }

    /// Broadcasts a request (and optionally a provocation) per candidate,
    /// then reads the cache once per address.
    pub fn sweep(&mut self, range: &AddressRange) -> Vec<Host> {
        debug!("Sweeping {range} ({} candidates)", range.len());

        for candidate in range.to_iter() {
            self.send(ArpFrame::request(self.local_hw, self.local_ip, candidate));
            if self.options.provoke {
                self.send(ArpFrame::reply(
                    self.local_hw,
                    self.local_ip,
                    MacAddr::broadcast(),
                    candidate,
                ));
            }
            self.clock.sleep(self.options.inter_request_delay);
        }

        let hosts: Vec<Host> = range
            .to_iter()
            .filter_map(|candidate| self.cache.lookup(candidate).map(|hw| Host::new(candidate).with_hardware(hw)))
            .collect();
        debug!("Sweep pass resolved {} host(s)", hosts.len());
        hosts
    }

    /// Sends a direct request per address and checks the cache right after.
    pub fn confirm(&mut self, range: &AddressRange) -> Vec<Host> {
        debug!("Confirming {range}");
        let mut hosts: Vec<Host> = Vec::new();

        for candidate in range.to_iter() {
            self.send(ArpFrame::request(self.local_hw, self.local_ip, candidate));
            self.clock.sleep(self.options.inter_request_delay);

            if let Some(hw) = self.cache.lookup(candidate) {
                hosts.push(Host::new(candidate).with_hardware(hw).responded());
            }
        }

        debug!("Confirmation pass resolved {} host(s)", hosts.len());
        hosts
    }

    fn send(&mut self, frame: ArpFrame) {
        match link::transmit(self.link, &frame) {
            Ok(()) => {}
            Err(e @ EngineError::AllocationError(_)) => warn!("Skipped frame to {}: {e}", frame.target_ip),
            Err(e) => warn!("Failed to send to {}: {e}", frame.target_ip),
        }
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
