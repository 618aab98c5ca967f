//! The ARP discovery and spoofing engine.
//!
//! Everything that touches the wire lives here: the datalink handle, the
//! neighbour cache readers, the range walker, the spoof controller and the TCP
//! port prober. Time and cancellation are injected so that every loop can run
//! against a virtual clock.

pub mod clock;
pub mod discovery;
pub mod link;
pub mod neighbors;
pub mod ports;
pub mod spoof;
pub mod vendors;
pub mod walker;
