use std::net::Ipv4Addr;

use arpscout_core::ports::{PortResult, PortState};
use colored::*;
use pnet::ipnetwork::Ipv4Network;
use pnet::util::MacAddr;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn ipv4_to_detail(addr: Ipv4Addr) -> Detail {
    ("IPv4".to_string(), addr.to_string().color(colors::IPV4_ADDR))
}

pub fn network_to_detail(net: &Ipv4Network) -> Detail {
    let address: ColoredString = net.ip().to_string().color(colors::IPV4_ADDR);
    let prefix: ColoredString = net.prefix().to_string().color(colors::IPV4_PREFIX);
    ("IPv4".to_string(), format!("{address}/{prefix}").color(colors::SEPARATOR))
}

pub fn mac_to_detail(mac: Option<MacAddr>) -> Option<Detail> {
    mac.map(|mac| ("MAC".to_string(), mac.to_string().color(colors::MAC_ADDR)))
}

pub fn vendor_to_detail(label: &str) -> Detail {
    ("Vendor".to_string(), label.color(colors::VENDOR))
}

pub fn host_details(address: Ipv4Addr, hardware: Option<MacAddr>, label: &str) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![ipv4_to_detail(address)];
    details.extend(mac_to_detail(hardware));
    details.push(vendor_to_detail(label));
    details
}

pub fn port_to_detail(result: &PortResult) -> Detail {
    let state: ColoredString = match result.state {
        PortState::Open => result.state.to_string().color(colors::PORT_OPEN).bold(),
        PortState::Closed => result.state.to_string().color(colors::PORT_CLOSED),
    };
    (result.port.to_string(), state)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_details_skip_missing_mac() {
        let keys = |details: Vec<Detail>| details.into_iter().map(|(k, _)| k).collect::<Vec<_>>();

        let with_mac = host_details(Ipv4Addr::new(10, 0, 0, 1), Some(MacAddr::new(2, 0, 0, 0, 0, 1)), "Unknown");
        assert_eq!(keys(with_mac), vec!["IPv4", "MAC", "Vendor"]);

        let bare = host_details(Ipv4Addr::new(10, 0, 0, 1), None, "Unknown");
        assert_eq!(keys(bare), vec!["IPv4", "Vendor"]);
    }

    #[test]
    fn port_detail_is_keyed_by_number() {
        let (key, value) = port_to_detail(&PortResult { port: 443, state: PortState::Open });
        assert_eq!(key, "443");
        assert_eq!(&*value, "open");
    }
}
