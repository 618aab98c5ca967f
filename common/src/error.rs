use std::net::Ipv4Addr;

use thiserror::Error;

/// Errors raised by the discovery and spoofing engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No usable network interface could be acquired for the operation.
    #[error("network interface unavailable: {0}")]
    InterfaceUnavailable(String),

    /// The frame buffer could not be reserved.
    #[error("failed to allocate a {0} byte frame buffer")]
    AllocationError(usize),

    /// The link layer refused or failed to transmit a frame.
    #[error("failed to transmit frame: {0}")]
    TransmitError(String),

    /// An inbound buffer is too short to hold an Ethernet + ARP frame.
    #[error("malformed frame: expected at least {expected} bytes, got {actual}")]
    MalformedFrame { expected: usize, actual: usize },

    /// An address range violates `1 <= first <= last <= 254`.
    #[error("invalid address range {first}..={last}")]
    InvalidRange { first: u8, last: u8 },

    /// A spoof session is already running.
    #[error("a spoof session is already running against {0}")]
    SessionActive(Ipv4Addr),

    /// The spoof target has no known hardware address.
    #[error("no hardware address known for {0}")]
    UnresolvedTarget(Ipv4Addr),

    /// A spoof session was driven before one was started.
    #[error("no spoof session has been started")]
    NoSession,
}

pub type Result<T> = std::result::Result<T, EngineError>;
