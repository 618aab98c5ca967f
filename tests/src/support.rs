use std::cell::Cell;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use arpscout_common::cancel::CancelSource;
use arpscout_common::error::{EngineError, Result};
use arpscout_common::network::interface::LocalIdentity;
use arpscout_common::vendors::VendorRepository;
use arpscout_core::clock::Clock;
use arpscout_core::link::FrameSender;
use arpscout_protocols::ArpFrame;
use pnet::datalink::dummy;
use pnet::ipnetwork::Ipv4Network;
use pnet::util::MacAddr;

pub const LOCAL_HW: MacAddr = MacAddr(0x02, 0x00, 0x5e, 0x00, 0x00, 0x01);
pub const LOCAL_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 100);

pub fn mac(last: u8) -> MacAddr {
    MacAddr::new(0x02, 0xaa, 0xbb, 0xcc, 0xdd, last)
}

pub fn identity() -> LocalIdentity {
    LocalIdentity {
        interface: dummy::dummy_interface(0),
        mac: LOCAL_HW,
        network: Ipv4Network::new(LOCAL_IP, 24).expect("valid prefix"),
    }
}

pub fn cache(entries: &[(Ipv4Addr, MacAddr)]) -> HashMap<Ipv4Addr, MacAddr> {
    entries.iter().copied().collect()
}

/// A virtual clock that only moves when something sleeps on it.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

/// Records every frame together with the virtual time it was sent at.
pub struct RecordingSender<'a> {
    clock: Option<&'a ManualClock>,
    pub sent: Vec<(Duration, ArpFrame)>,
}

impl<'a> RecordingSender<'a> {
    pub fn new() -> Self {
        Self { clock: None, sent: Vec::new() }
    }

    pub fn timed(clock: &'a ManualClock) -> Self {
        Self { clock: Some(clock), sent: Vec::new() }
    }

    pub fn frames(&self) -> Vec<ArpFrame> {
        self.sent.iter().map(|(_, frame)| *frame).collect()
    }

    pub fn times(&self) -> Vec<Duration> {
        self.sent.iter().map(|(at, _)| *at).collect()
    }
}

impl FrameSender for RecordingSender<'_> {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let at = self.clock.map_or(Duration::ZERO, |clock| clock.now());
        self.sent.push((at, ArpFrame::decode(frame)?));
        Ok(())
    }
}

pub enum Failure {
    Everything,
    Targets(Vec<Ipv4Addr>),
}

/// Refuses frames according to its [`Failure`] mode and records the rest.
pub struct FailingSender {
    failure: Failure,
    pub refused: usize,
    pub delivered: Vec<ArpFrame>,
}

impl FailingSender {
    pub fn new(failure: Failure) -> Self {
        Self { failure, refused: 0, delivered: Vec::new() }
    }
}

impl FrameSender for FailingSender {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let frame = ArpFrame::decode(frame)?;
        let refuse = match &self.failure {
            Failure::Everything => true,
            Failure::Targets(targets) => targets.contains(&frame.target_ip),
        };
        if refuse {
            self.refused += 1;
            return Err(EngineError::TransmitError("simulated link failure".into()));
        }
        self.delivered.push(frame);
        Ok(())
    }
}

/// Requests cancellation once the clock reaches `at`.
pub struct CancelAt<'a> {
    pub clock: &'a ManualClock,
    pub at: Duration,
}

impl CancelSource for CancelAt<'_> {
    fn poll(&self) -> bool {
        self.clock.now() >= self.at
    }
}

pub struct StaticVendors(pub HashMap<MacAddr, &'static str>);

impl VendorRepository for StaticVendors {
    fn get_vendor(&self, mac_addr: MacAddr) -> Option<String> {
        self.0.get(&mac_addr).map(|name| name.to_string())
    }
}
