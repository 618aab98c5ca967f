//! Shared models and boundaries for the `arpscout` engine.
//!
//! Everything here is free of raw-socket I/O: the data model (hosts, address
//! ranges, interfaces), the error type, and the narrow traits through which the
//! engine talks to its collaborators (cancellation, presentation, vendors).

pub mod cancel;
pub mod config;
pub mod error;
pub mod macros;
pub mod network;
pub mod sink;
pub mod vendors;

#[doc(hidden)]
pub use tracing;
