//! End-to-end tests of the engine through its public API, with in-memory
//! stand-ins for the link, the neighbour cache, the clock and the operator.

#[cfg(test)]
mod support;

#[cfg(test)]
mod codec;
#[cfg(test)]
mod discovery;
#[cfg(test)]
mod ports;
#[cfg(test)]
mod spoof;
