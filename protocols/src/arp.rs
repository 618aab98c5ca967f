//! The Ethernet + ARP frame codec.
//!
//! Frames are always `[Ethernet header (14)][ARP header (28)]` with 6-byte
//! hardware and 4-byte protocol addresses, so every field sits at a fixed
//! offset. Multi-byte integers are big-endian on the wire.

use std::fmt;
use std::net::Ipv4Addr;

use arpscout_common::error::{EngineError, Result};
use pnet::packet::Packet;
use pnet::packet::arp::{
    ArpHardwareType, ArpHardwareTypes, ArpOperation, ArpOperations, ArpPacket, MutableArpPacket,
};
use pnet::packet::ethernet::{EtherType, EtherTypes, EthernetPacket};
use pnet::util::MacAddr;

use crate::ethernet::{self, ETH_HDR_LEN};

pub const ARP_LEN: usize = 28;
pub const ARP_FRAME_LEN: usize = ETH_HDR_LEN + ARP_LEN;

const HW_ADDR_LEN: u8 = 6;
const PROTO_ADDR_LEN: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpFrame {
    pub eth_dest: MacAddr,
    pub eth_src: MacAddr,
    pub ethertype: EtherType,
    pub hw_type: ArpHardwareType,
    pub proto_type: EtherType,
    pub hw_len: u8,
    pub proto_len: u8,
    pub opcode: ArpOperation,
    pub sender_hw: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_hw: MacAddr,
    pub target_ip: Ipv4Addr,
}

impl ArpFrame {
    /// A broadcast "who-has `target_ip`" request.
    pub fn request(src_hw: MacAddr, src_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Self {
        Self::with_fixed_fields(
            MacAddr::broadcast(),
            src_hw,
            ArpOperations::Request,
            (src_hw, src_ip),
            (MacAddr::zero(), target_ip),
        )
    }

    /// A reply claiming `sender_ip` is at `src_hw`, addressed to `(dst_hw, target_ip)`.
    ///
    /// Whether this is honest or forged depends entirely on `sender_ip`.
    pub fn reply(src_hw: MacAddr, sender_ip: Ipv4Addr, dst_hw: MacAddr, target_ip: Ipv4Addr) -> Self {
        Self::with_fixed_fields(
            dst_hw,
            src_hw,
            ArpOperations::Reply,
            (src_hw, sender_ip),
            (dst_hw, target_ip),
        )
    }

    fn with_fixed_fields(
        eth_dest: MacAddr,
        eth_src: MacAddr,
        opcode: ArpOperation,
        (sender_hw, sender_ip): (MacAddr, Ipv4Addr),
        (target_hw, target_ip): (MacAddr, Ipv4Addr),
    ) -> Self {
        Self {
            eth_dest,
            eth_src,
            ethertype: EtherTypes::Arp,
            hw_type: ArpHardwareTypes::Ethernet,
            proto_type: EtherTypes::Ipv4,
            hw_len: HW_ADDR_LEN,
            proto_len: PROTO_ADDR_LEN,
            opcode,
            sender_hw,
            sender_ip,
            target_hw,
            target_ip,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.opcode == ArpOperations::Reply
    }

    /// Serializes the frame into a freshly allocated 42 byte buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer: Vec<u8> = Vec::new();
        buffer
            .try_reserve_exact(ARP_FRAME_LEN)
            .map_err(|_| EngineError::AllocationError(ARP_FRAME_LEN))?;
        buffer.resize(ARP_FRAME_LEN, 0);

        ethernet::make_header(&mut buffer, self.eth_src, self.eth_dest, self.ethertype)?;

        let mut arp = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..])
            .ok_or(EngineError::AllocationError(ARP_FRAME_LEN))?;
        arp.set_hardware_type(self.hw_type);
        arp.set_protocol_type(self.proto_type);
        arp.set_hw_addr_len(self.hw_len);
        arp.set_proto_addr_len(self.proto_len);
        arp.set_operation(self.opcode);
        arp.set_sender_hw_addr(self.sender_hw);
        arp.set_sender_proto_addr(self.sender_ip);
        arp.set_target_hw_addr(self.target_hw);
        arp.set_target_proto_addr(self.target_ip);

        Ok(buffer)
    }

    /// Parses a frame. Trailing bytes (e.g. link padding) are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let malformed = EngineError::MalformedFrame {
            expected: ARP_FRAME_LEN,
            actual: bytes.len(),
        };
        if bytes.len() < ARP_FRAME_LEN {
            return Err(malformed);
        }

        let eth = EthernetPacket::new(bytes).ok_or(malformed)?;
        let arp = ArpPacket::new(eth.payload()).ok_or(EngineError::MalformedFrame {
            expected: ARP_FRAME_LEN,
            actual: bytes.len(),
        })?;

        Ok(Self {
            eth_dest: eth.get_destination(),
            eth_src: eth.get_source(),
            ethertype: eth.get_ethertype(),
            hw_type: arp.get_hardware_type(),
            proto_type: arp.get_protocol_type(),
            hw_len: arp.get_hw_addr_len(),
            proto_len: arp.get_proto_addr_len(),
            opcode: arp.get_operation(),
            sender_hw: arp.get_sender_hw_addr(),
            sender_ip: arp.get_sender_proto_addr(),
            target_hw: arp.get_target_hw_addr(),
            target_ip: arp.get_target_proto_addr(),
        })
    }
}

/// Returns `true` when the Ethernet header of `bytes` announces an ARP payload.
pub fn is_arp(bytes: &[u8]) -> bool {
    EthernetPacket::new(bytes).is_some_and(|eth| eth.get_ethertype() == EtherTypes::Arp)
}

impl fmt::Display for ArpFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.opcode {
            ArpOperations::Request => "request",
            ArpOperations::Reply => "reply",
            ArpOperation(other) => return write!(f, "opcode 0x{other:04x} {} > {}", self.eth_src, self.eth_dest),
        };
        write!(
            f,
            "{op} {} is-at {} > {} ({}) | eth {} > {} type 0x{:04x} | hw 0x{:04x}/{} proto 0x{:04x}/{}",
            self.sender_ip,
            self.sender_hw,
            self.target_ip,
            self.target_hw,
            self.eth_src,
            self.eth_dest,
            self.ethertype.0,
            self.hw_type.0,
            self.hw_len,
            self.proto_type.0,
            self.proto_len,
        )
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
