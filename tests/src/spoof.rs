use std::net::Ipv4Addr;
use std::time::Duration;

use arpscout_common::cancel::Never;
use arpscout_common::error::{EngineError, Result};
use arpscout_core::clock::Clock;
use arpscout_core::link::FrameSender;
use arpscout_core::spoof::{SessionState, SpoofController, SpoofOptions, StopReason, TickOutcome};

use crate::support::{self, CancelAt, Failure, FailingSender, LOCAL_HW, LOCAL_IP, ManualClock, RecordingSender};

const INTERVAL: Duration = Duration::from_millis(2000);
const TARGET_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 20);

fn controller(spoof_ip: Option<Ipv4Addr>) -> SpoofController {
    SpoofController::new(LOCAL_HW, LOCAL_IP, SpoofOptions { interval: INTERVAL, spoof_ip })
}

#[test]
fn three_intervals_produce_three_forged_replies() {
    let gateway = Ipv4Addr::new(10, 0, 0, 1);
    let clock = ManualClock::default();
    let mut link = RecordingSender::timed(&clock);
    let cancel = CancelAt { clock: &clock, at: INTERVAL * 3 };

    let mut ctl = controller(Some(gateway));
    ctl.start(TARGET_IP, Some(support::mac(20))).unwrap();
    let report = ctl.run(&mut link, &clock, &cancel).unwrap();

    let frames = link.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(report.sent, 3);
    assert_eq!(link.times(), vec![Duration::ZERO, INTERVAL, INTERVAL * 2]);
    for frame in frames {
        assert!(frame.is_reply());
        assert_eq!(frame.eth_dest, support::mac(20));
        assert_eq!(frame.eth_src, LOCAL_HW);
        assert_eq!((frame.sender_hw, frame.sender_ip), (LOCAL_HW, gateway));
        assert_eq!((frame.target_hw, frame.target_ip), (support::mac(20), TARGET_IP));
    }
}

#[test]
fn spoof_ip_defaults_to_the_local_address() {
    let clock = ManualClock::default();
    let mut link = RecordingSender::timed(&clock);
    let cancel = CancelAt { clock: &clock, at: Duration::from_millis(1) };

    let mut ctl = controller(None);
    ctl.start(TARGET_IP, Some(support::mac(20))).unwrap();
    let report = ctl.run(&mut link, &clock, &cancel).unwrap();

    assert_eq!(report.spoof_ip, LOCAL_IP);
    assert_eq!(link.frames()[0].sender_ip, LOCAL_IP);
}

#[test]
fn cancellation_between_intervals_stops_transmission() {
    let clock = ManualClock::default();
    let mut link = RecordingSender::timed(&clock);
    let cancel_at = INTERVAL + Duration::from_millis(1);
    let cancel = CancelAt { clock: &clock, at: cancel_at };

    let mut ctl = controller(None);
    ctl.start(TARGET_IP, Some(support::mac(20))).unwrap();
    let report = ctl.run(&mut link, &clock, &cancel).unwrap();

    assert_eq!(report.reason, StopReason::Cancelled);
    assert_eq!(ctl.state(), SessionState::Stopped);
    assert_eq!(link.frames().len(), 2);
    assert!(link.times().iter().all(|at| *at < cancel_at));

    let before = link.frames().len();
    assert_eq!(
        ctl.tick(INTERVAL * 10, &mut link, &Never),
        TickOutcome::Stopped(StopReason::Cancelled)
    );
    assert_eq!(link.frames().len(), before);
}

#[test]
fn start_while_running_fails_fast_without_transmitting() {
    let mut link = RecordingSender::new();
    let mut ctl = controller(None);
    ctl.start(TARGET_IP, Some(support::mac(20))).unwrap();

    let second = ctl.start(Ipv4Addr::new(10, 0, 0, 30), Some(support::mac(30)));

    assert!(matches!(second, Err(EngineError::SessionActive(ip)) if ip == TARGET_IP));
    assert!(link.frames().is_empty());
    assert_eq!(ctl.session().map(|s| s.target_ip), Some(TARGET_IP));

    assert_eq!(ctl.tick(Duration::ZERO, &mut link, &Never), TickOutcome::Sent);
    assert_eq!(link.frames()[0].target_ip, TARGET_IP);
}

#[test]
fn start_without_hardware_is_rejected() {
    let mut ctl = controller(None);
    assert!(matches!(ctl.start(TARGET_IP, None), Err(EngineError::UnresolvedTarget(_))));
    assert_eq!(ctl.state(), SessionState::Idle);
}

#[test]
fn transmit_error_stops_the_session() {
    let clock = ManualClock::default();
    let mut link = FailingSender::new(Failure::Everything);

    let mut ctl = controller(None);
    ctl.start(TARGET_IP, Some(support::mac(20))).unwrap();
    let report = ctl.run(&mut link, &clock, &Never).unwrap();

    assert_eq!(report.reason, StopReason::TransmitFailed);
    assert_eq!(report.sent, 0);
    assert_eq!(link.refused, 1);
    assert_eq!(ctl.state(), SessionState::Stopped);
}

#[test]
fn stop_is_idempotent() {
    let mut ctl = controller(None);
    ctl.stop();
    assert_eq!(ctl.state(), SessionState::Idle);

    ctl.start(TARGET_IP, Some(support::mac(20))).unwrap();
    ctl.stop();
    ctl.stop();
    assert_eq!(ctl.state(), SessionState::Stopped);
}

/// Holds the first send for `stall` of virtual time, like a blocking driver.
struct StallingSender<'a> {
    inner: RecordingSender<'a>,
    clock: &'a ManualClock,
    stall: Option<Duration>,
}

impl FrameSender for StallingSender<'_> {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.inner.send(frame)?;
        if let Some(stall) = self.stall.take() {
            self.clock.sleep(stall);
        }
        Ok(())
    }
}

#[test]
fn stalled_send_does_not_replay_missed_intervals() {
    let clock = ManualClock::default();
    let mut link = StallingSender {
        inner: RecordingSender::timed(&clock),
        clock: &clock,
        stall: Some(INTERVAL * 5),
    };

    let mut ctl = controller(None);
    ctl.start(TARGET_IP, Some(support::mac(20))).unwrap();
    let outcomes: Vec<TickOutcome> = (0..6).map(|_| ctl.tick(clock.now(), &mut link, &Never)).collect();

    assert_eq!(link.inner.times(), vec![Duration::ZERO, INTERVAL * 5]);
    assert_eq!(outcomes[..2], [TickOutcome::Sent, TickOutcome::Sent]);
    assert!(outcomes[2..].iter().all(|o| *o == TickOutcome::Waiting(INTERVAL)));

    clock.sleep(INTERVAL);
    assert_eq!(ctl.tick(clock.now(), &mut link, &Never), TickOutcome::Sent);
    assert_eq!(link.inner.times().last(), Some(&(INTERVAL * 6)));
}

/// Fails to allocate the first frame, then records the rest.
struct ShortOfBuffers {
    failed: bool,
    inner: RecordingSender<'static>,
}

impl FrameSender for ShortOfBuffers {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        if !self.failed {
            self.failed = true;
            return Err(EngineError::AllocationError(frame.len()));
        }
        self.inner.send(frame)
    }
}

#[test]
fn allocation_failure_skips_one_send_and_keeps_running() {
    let mut link = ShortOfBuffers { failed: false, inner: RecordingSender::new() };
    let mut ctl = controller(None);
    ctl.start(TARGET_IP, Some(support::mac(20))).unwrap();

    assert_eq!(ctl.tick(Duration::ZERO, &mut link, &Never), TickOutcome::Waiting(INTERVAL));
    assert_eq!(ctl.state(), SessionState::Running);
    assert_eq!(ctl.session().map(|s| s.sent), Some(0));
    assert!(link.inner.frames().is_empty());

    assert_eq!(ctl.tick(INTERVAL, &mut link, &Never), TickOutcome::Sent);
    assert_eq!(ctl.session().map(|s| s.sent), Some(1));
    assert_eq!(link.inner.frames().len(), 1);
}

#[test]
fn run_without_a_session_is_rejected() {
    let clock = ManualClock::default();
    let mut link = RecordingSender::new();
    let mut ctl = controller(None);

    assert!(matches!(ctl.run(&mut link, &clock, &Never), Err(EngineError::NoSession)));
    assert!(link.frames().is_empty());
}
