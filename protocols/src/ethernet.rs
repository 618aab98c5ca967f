use arpscout_common::error::{EngineError, Result};
use pnet::packet::ethernet::{EtherType, MutableEthernetPacket};
use pnet::util::MacAddr;

pub const ETH_HDR_LEN: usize = 14;

/// Writes an Ethernet II header into the start of `buffer`.
pub fn make_header(
    buffer: &mut [u8],
    src_mac: MacAddr,
    dst_mac: MacAddr,
    et: EtherType,
) -> Result<()> {
    let mut eth = MutableEthernetPacket::new(buffer)
        .ok_or(EngineError::AllocationError(ETH_HDR_LEN))?;

    eth.set_source(src_mac);
    eth.set_destination(dst_mac);
    eth.set_ethertype(et);

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
