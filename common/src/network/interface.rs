use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use pnet::util::MacAddr;
use tracing::debug;

#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};
#[cfg(target_os = "macos")]
use macos_impl::{is_physical, is_wireless};
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use other_impl::{is_physical, is_wireless};

use crate::error::{EngineError, Result};
use crate::network::range::AddressRange;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface was filtered out as "not physical" by the provided logic.
    NotPhysical,
    /// The interface does not have a MAC address.
    NoMacAddress,
    /// The interface does not support broadcast (required for ARP).
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
    /// The interface has no private IPv4 address.
    NoValidLanIp,
}

/// The acquired interface together with this device's own link and network
/// addresses on it.
#[derive(Debug, Clone)]
pub struct LocalIdentity {
    pub interface: NetworkInterface,
    pub mac: MacAddr,
    pub network: Ipv4Network,
}

impl LocalIdentity {
    pub fn ip(&self) -> Ipv4Addr {
        self.network.ip()
    }

    pub fn netmask(&self) -> Ipv4Addr {
        self.network.mask()
    }

    /// The address range a discovery pass walks on this interface.
    pub fn address_range(&self) -> Result<AddressRange> {
        AddressRange::from_network(self.network)
    }
}

/// Acquires the interface for one scan or spoof operation.
///
/// With a `name` the interface is looked up directly; otherwise the best
/// viable LAN interface is selected, wired before wireless.
pub fn get_interface(name: Option<&str>) -> Result<LocalIdentity> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    debug!("Identified {} network interface(s)", interfaces.len());

    let interface: NetworkInterface = match name {
        Some(name) => {
            let interface = interfaces
                .into_iter()
                .find(|interface| interface.name == name)
                .ok_or_else(|| EngineError::InterfaceUnavailable(format!("no interface named {name}")))?;
            is_viable_lan_interface(&interface, |_| true).map_err(|e| {
                EngineError::InterfaceUnavailable(format!("{name} cannot be used: {e:?}"))
            })?;
            interface
        }
        None => {
            let viable: Vec<NetworkInterface> = interfaces
                .into_iter()
                .filter(|interface| is_viable_lan_interface(interface, is_physical).is_ok())
                .collect();
            select_best_lan_interface(viable, is_wired).ok_or_else(|| {
                EngineError::InterfaceUnavailable("no interfaces available for LAN discovery".into())
            })?
        }
    };

    identity_of(interface)
}

/// Extracts the local MAC and private IPv4 network from an interface.
pub fn identity_of(interface: NetworkInterface) -> Result<LocalIdentity> {
    let mac: MacAddr = interface.mac.ok_or_else(|| {
        EngineError::InterfaceUnavailable(format!("{} has no MAC address", interface.name))
    })?;

    let network: Ipv4Network = interface
        .ips
        .iter()
        .find_map(|net| match net {
            IpNetwork::V4(v4) if v4.ip().is_private() => Some(*v4),
            _ => None,
        })
        .ok_or_else(|| {
            EngineError::InterfaceUnavailable(format!("{} has no private IPv4 address", interface.name))
        })?;

    Ok(LocalIdentity {
        interface,
        mac,
        network,
    })
}

/// Lists every interface that passes the LAN viability checks.
pub fn get_viable_interfaces() -> Vec<NetworkInterface> {
    datalink::interfaces()
        .into_iter()
        .filter(|interface| is_viable_lan_interface(interface, is_physical).is_ok())
        .collect()
}

fn is_viable_lan_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> std::result::Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if !is_physical(interface) {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    let has_valid_ip = interface.ips.iter().any(|net| match net {
        IpNetwork::V4(ipv4) => ipv4.ip().is_private(),
        IpNetwork::V6(_) => false,
    });
    if !has_valid_ip {
        return Err(ViabilityError::NoValidLanIp);
    }

    Ok(())
}

fn select_best_lan_interface(
    interfaces: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<NetworkInterface> {
    match interfaces.len() {
        0 => None,
        1 => interfaces.into_iter().next(),
        _ => {
            debug!("More than one candidate found, selecting best option...");
            let wired = interfaces.iter().position(|interface| is_wired(interface)).unwrap_or(0);
            interfaces.into_iter().nth(wired)
        }
    }
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(target_os = "macos")]
mod macos_impl {
    use super::*;
    use std::collections::HashSet;
    use std::process::Command;
    use std::sync::OnceLock;

    struct HardwareInfo {
        physical_devices: HashSet<String>,
        wireless_devices: HashSet<String>,
    }

    /// Runs `networksetup` once on first access.
    fn get_hardware_info() -> &'static HardwareInfo {
        static HARDWARE_INFO: OnceLock<HardwareInfo> = OnceLock::new();

        HARDWARE_INFO.get_or_init(|| {
            let mut physical = HashSet::new();
            let mut wireless = HashSet::new();

            if let Ok(output) = Command::new("networksetup").arg("-listallhardwareports").output() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                for line in stdout.lines() {
                    if let Some(device) = line.strip_prefix("Device: ") {
                        physical.insert(device.trim().to_string());
                    }
                }
            }

            for device in &physical {
                let is_wifi = Command::new("networksetup")
                    .arg("-getairportnetwork")
                    .arg(device)
                    .output()
                    .map(|out| out.status.success())
                    .unwrap_or(false);

                if is_wifi {
                    wireless.insert(device.clone());
                }
            }

            HardwareInfo {
                physical_devices: physical,
                wireless_devices: wireless,
            }
        })
    }

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        get_hardware_info().physical_devices.contains(&interface.name)
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        get_hardware_info().wireless_devices.contains(&interface.name)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod other_impl {
    use super::*;

    pub fn is_physical(_interface: &NetworkInterface) -> bool {
        true
    }

    pub fn is_wireless(_interface: &NetworkInterface) -> bool {
        false
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
