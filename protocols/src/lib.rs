//! Wire formats spoken by the engine.

pub mod arp;
pub mod ethernet;

pub use arp::ArpFrame;
