//! # Network Discovery Service
//!
//! Implements the "find hosts on the local segment" use case: acquires the
//! datalink channel, walks the address range, and hands the result to a
//! presentation sink labelled with vendor names.

use arpscout_common::error::Result;
use arpscout_common::network::host::Host;
use arpscout_common::network::interface::LocalIdentity;
use arpscout_common::network::range::AddressRange;
use arpscout_common::sink::HostSink;
use arpscout_common::success;
use arpscout_common::vendors::VendorRepository;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::link::{DatalinkHandle, FrameSender};
use crate::neighbors::{ArpCache, NeighborCache};
use crate::walker::{DiscoveryOptions, RangeWalker};

pub const UNKNOWN_VENDOR: &str = "Unknown";

pub struct DiscoveryService {
    vendor_repo: Box<dyn VendorRepository>,
    options: DiscoveryOptions,
}

impl DiscoveryService {
    pub fn new(vendor_repo: Box<dyn VendorRepository>, options: DiscoveryOptions) -> Self {
        Self { vendor_repo, options }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Runs discovery on the live interface.
    ///
    /// Failing to open the channel is fatal and yields no partial results.
    pub fn discover(&self, identity: &LocalIdentity, range: &AddressRange) -> Result<Vec<Host>> {
        let mut link = DatalinkHandle::open(identity)?;
        let cache = NeighborCache::new(link.neighbors());
        let clock = SystemClock::new();

        info!("Searching for hosts from {range} on {}", link.interface_name());
        let hosts = self.perform_discovery(identity, range, &mut link, &cache, &clock);
        success!("Discovery finished, {} host(s) found", hosts.len());
        Ok(hosts)
    }

    /// Walks `range` with the given collaborators and returns the merged hosts.
    pub fn perform_discovery(
        &self,
        identity: &LocalIdentity,
        range: &AddressRange,
        link: &mut dyn FrameSender,
        cache: &dyn ArpCache,
        clock: &dyn Clock,
    ) -> Vec<Host> {
        RangeWalker::new(identity.mac, identity.ip(), self.options, link, cache, clock).walk(range)
    }

    /// The presentation label for a host: its vendor name, if known.
    pub fn label(&self, host: &Host) -> String {
        host.hardware
            .and_then(|mac| self.vendor_repo.get_vendor(mac))
            .unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
    }

    /// Hands every host to the sink in order.
    pub fn publish(&self, hosts: &[Host], sink: &mut dyn HostSink) {
        for host in hosts {
            sink.emit(host.address, host.hardware, &self.label(host));
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
