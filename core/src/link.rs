//! Raw datalink access for one operation.
//!
//! [`DatalinkHandle`] owns the Ethernet channel of the acquired interface. The
//! transmit half is exposed through [`FrameSender`]; the receive half is moved
//! onto a capture thread that snoops ARP replies into a [`NeighborTable`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use arpscout_common::error::{EngineError, Result};
use arpscout_common::network::interface::LocalIdentity;
use arpscout_protocols::arp::{self, ArpFrame};
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::util::MacAddr;
use tracing::{debug, trace, warn};

use crate::neighbors::NeighborTable;

const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// The link-layer transmit primitive.
pub trait FrameSender {
    fn send(&mut self, frame: &[u8]) -> Result<()>;
}

impl<T: FrameSender + ?Sized> FrameSender for &mut T {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }
}

impl<T: FrameSender + ?Sized> FrameSender for Box<T> {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }
}

/// Encodes and transmits a frame, logging it in decoded form first.
pub fn transmit(link: &mut dyn FrameSender, frame: &ArpFrame) -> Result<()> {
    let bytes: Vec<u8> = frame.encode()?;
    debug!("tx {frame}");
    link.send(&bytes)
}

pub struct DatalinkHandle {
    interface_name: String,
    tx: Box<dyn DataLinkSender>,
    neighbors: NeighborTable,
    running: Arc<AtomicBool>,
}

impl DatalinkHandle {
    pub fn open(identity: &LocalIdentity) -> Result<Self> {
        Self::open_with(identity, datalink::channel)
    }

    /// Opens the channel through `opener`, which lets tests substitute
    /// `pnet::datalink::dummy::channel`.
    pub fn open_with<F>(identity: &LocalIdentity, opener: F) -> Result<Self>
    where
        F: FnOnce(&NetworkInterface, Config) -> std::io::Result<Channel>,
    {
        let interface: &NetworkInterface = &identity.interface;
        let (tx, rx) = open_eth_channel(interface, &get_config(), opener)?;

        let neighbors = NeighborTable::new();
        let running = Arc::new(AtomicBool::new(true));
        spawn_receiver(rx, identity.mac, neighbors.clone(), Arc::clone(&running))?;

        debug!("Datalink channel open on {}", interface.name);
        Ok(Self {
            interface_name: interface.name.clone(),
            tx,
            neighbors,
            running,
        })
    }

    /// Replies observed on this channel since it was opened.
    pub fn neighbors(&self) -> NeighborTable {
        self.neighbors.clone()
    }

    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }
}

impl FrameSender for DatalinkHandle {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        match self.tx.send_to(frame, None) {
            Some(Ok(())) => Ok(()),
            Some(Err(e)) => Err(EngineError::TransmitError(e.to_string())),
            None => Err(EngineError::TransmitError(format!(
                "{} did not accept the frame",
                self.interface_name
            ))),
        }
    }
}

impl Drop for DatalinkHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        debug!("Released datalink channel on {}", self.interface_name);
    }
}

fn open_eth_channel<F>(
    interface: &NetworkInterface,
    cfg: &Config,
    opener: F,
) -> Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>)>
where
    F: FnOnce(&NetworkInterface, Config) -> std::io::Result<Channel>,
{
    match opener(interface, *cfg) {
        Ok(Channel::Ethernet(tx, rx)) => Ok((tx, rx)),
        Ok(_) => Err(EngineError::InterfaceUnavailable(format!(
            "non-ethernet channel for {}",
            interface.name
        ))),
        Err(e) => Err(EngineError::InterfaceUnavailable(format!(
            "opening on {}: {e}",
            interface.name
        ))),
    }
}

fn get_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
    }
}

fn spawn_receiver(
    mut rx: Box<dyn DataLinkReceiver>,
    local_mac: MacAddr,
    neighbors: NeighborTable,
    running: Arc<AtomicBool>,
) -> Result<()> {
    thread::Builder::new()
        .name("arp-snoop".into())
        .spawn(move || {
            while running.load(Ordering::Relaxed) {
                match rx.next() {
                    Ok(bytes) => handle_frame(bytes, local_mac, &neighbors),
                    Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                    Err(e) => {
                        debug!("Capture stopped: {e}");
                        break;
                    }
                }
            }
        })
        .map(|_| ())
        .map_err(|e| EngineError::InterfaceUnavailable(format!("capture thread: {e}")))
}

/// Records the sender of every ARP reply that did not originate here.
fn handle_frame(bytes: &[u8], local_mac: MacAddr, neighbors: &NeighborTable) {
    if !arp::is_arp(bytes) {
        return;
    }
    let frame: ArpFrame = match ArpFrame::decode(bytes) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("Dropped inbound frame: {e}");
            return;
        }
    };
    trace!("rx {frame}");

    if frame.is_reply() && frame.sender_hw != local_mac {
        if frame.sender_ip.is_unspecified() {
            warn!("Ignoring reply from {} with an unspecified sender", frame.sender_hw);
            return;
        }
        neighbors.record(frame.sender_ip, frame.sender_hw);
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
