use anyhow::Context;
use arpscout_common::config::Config;
use arpscout_common::network::interface::{self, LocalIdentity};
use colored::*;
use is_root::is_root;
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;
use tracing::warn;

use crate::terminal::format::{self, Detail};
use crate::terminal::{colors, print};

pub fn info(cfg: &Config) -> anyhow::Result<()> {
    print::aligned_line("Version", env!("CARGO_PKG_VERSION"));
    print::aligned_line("Privileges", if is_root() { "root".green() } else { "unprivileged".yellow() });

    let identity = interface::get_interface(cfg.interface.as_deref()).context("acquiring a network interface")?;
    print_identity(&identity, cfg.quiet);

    print::header("usable interfaces", cfg.quiet);
    let viable: Vec<NetworkInterface> = interface::get_viable_interfaces();
    for (idx, interface) in viable.iter().enumerate() {
        print_interface(interface, idx);
    }

    print::end_of_program();
    Ok(())
}

/// Shows the address and hardware address this device uses on the segment.
pub fn print_identity(identity: &LocalIdentity, quiet: u8) {
    if quiet > 1 {
        return;
    }
    print::header("local identity", quiet);
    print::aligned_line("Interface", identity.interface.name.as_str());
    print::aligned_line("IPv4", identity.ip().to_string().color(colors::IPV4_ADDR));
    print::aligned_line("Netmask", identity.netmask().to_string().color(colors::IPV4_PREFIX));
    print::aligned_line("MAC", identity.mac.to_string().color(colors::MAC_ADDR));
    match identity.address_range() {
        Ok(range) => print::aligned_line("Range", range.to_string()),
        Err(e) => warn!("No walkable range on {}: {e}", identity.interface.name),
    }
}

/// Warns that raw sockets usually need elevated privileges.
pub fn warn_if_unprivileged() {
    if !is_root() {
        warn!("Not running as root, opening a raw channel will likely fail");
    }
}

fn print_interface(interface: &NetworkInterface, idx: usize) {
    print::tree_head(idx, &interface.name);
    let mut details: Vec<Detail> = interface
        .ips
        .iter()
        .filter_map(|net| match net {
            IpNetwork::V4(v4) => Some(format::network_to_detail(v4)),
            IpNetwork::V6(_) => None,
        })
        .collect();
    details.extend(format::mac_to_detail(interface.mac));
    print::as_tree_one_level(details);
}
