use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// Receives discovered hosts for display and selection.
///
/// The engine emits one call per host in ascending address order and owns no
/// rendering logic; selection affordances are built by the implementor.
pub trait HostSink {
    fn emit(&mut self, address: Ipv4Addr, hardware: Option<MacAddr>, label: &str);
}

impl HostSink for Vec<(Ipv4Addr, Option<MacAddr>, String)> {
    fn emit(&mut self, address: Ipv4Addr, hardware: Option<MacAddr>, label: &str) {
        self.push((address, hardware, label.to_string()));
    }
}
