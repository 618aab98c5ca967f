use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use arpscout_common::network::host::Host;
use arpscout_common::network::range::AddressRange;
use arpscout_core::clock::Clock;
use arpscout_core::discovery::{DiscoveryService, UNKNOWN_VENDOR};
use arpscout_core::walker::{DiscoveryOptions, RangeWalker};
use pnet::packet::arp::ArpOperations;
use pnet::util::MacAddr;

use crate::support::{self, Failure, FailingSender, LOCAL_HW, LOCAL_IP, ManualClock, RecordingSender, StaticVendors};

fn range_1_to_5() -> AddressRange {
    AddressRange::new(Ipv4Addr::new(10, 0, 0, 0), 1, 5).unwrap()
}

fn sweep_only() -> DiscoveryOptions {
    DiscoveryOptions {
        confirm_pass: false,
        ..Default::default()
    }
}

fn confirm_only() -> DiscoveryOptions {
    DiscoveryOptions {
        sweep_pass: false,
        ..Default::default()
    }
}

#[test]
fn sweep_issues_one_request_per_candidate_in_ascending_order() {
    let mut link = RecordingSender::new();
    let cache = support::cache(&[]);
    let clock = ManualClock::default();

    let hosts = RangeWalker::new(LOCAL_HW, LOCAL_IP, sweep_only(), &mut link, &cache, &clock).walk(&range_1_to_5());

    let frames = link.frames();
    let targets: Vec<Ipv4Addr> = frames.iter().map(|f| f.target_ip).collect();
    assert_eq!(targets, (1..=5).map(|i| Ipv4Addr::new(10, 0, 0, i)).collect::<Vec<_>>());
    for frame in &frames {
        assert_eq!(frame.opcode, ArpOperations::Request);
        assert_eq!(frame.eth_dest, MacAddr::broadcast());
        assert_eq!((frame.sender_hw, frame.sender_ip), (LOCAL_HW, LOCAL_IP));
    }
    assert!(hosts.is_empty());
    assert_eq!(clock.now(), Duration::from_millis(50));
}

#[test]
fn discovery_returns_exactly_the_cached_hosts_ascending() {
    let cache = support::cache(&[
        (Ipv4Addr::new(10, 0, 0, 4), support::mac(4)),
        (Ipv4Addr::new(10, 0, 0, 2), support::mac(2)),
        (Ipv4Addr::new(10, 0, 0, 9), support::mac(9)),
    ]);
    let clock = ManualClock::default();

    for options in [sweep_only(), confirm_only(), DiscoveryOptions::default()] {
        let mut link = RecordingSender::new();
        let hosts = RangeWalker::new(LOCAL_HW, LOCAL_IP, options, &mut link, &cache, &clock).walk(&range_1_to_5());

        let found: Vec<(Ipv4Addr, Option<MacAddr>)> = hosts.iter().map(|h| (h.address, h.hardware)).collect();
        assert_eq!(
            found,
            vec![
                (Ipv4Addr::new(10, 0, 0, 2), Some(support::mac(2))),
                (Ipv4Addr::new(10, 0, 0, 4), Some(support::mac(4))),
            ]
        );
        assert_eq!(hosts.iter().all(|h| h.responded), options.confirm_pass);
    }
}

#[test]
fn both_passes_send_twice_per_candidate() {
    let mut link = RecordingSender::new();
    let cache = support::cache(&[]);
    let clock = ManualClock::default();

    RangeWalker::new(LOCAL_HW, LOCAL_IP, DiscoveryOptions::default(), &mut link, &cache, &clock).walk(&range_1_to_5());

    assert_eq!(link.frames().len(), 10);
    assert!(link.frames().iter().all(|f| f.opcode == ArpOperations::Request));
}

#[test]
fn provocation_is_off_unless_enabled() {
    let cache = support::cache(&[]);
    let clock = ManualClock::default();

    let mut plain = RecordingSender::new();
    RangeWalker::new(LOCAL_HW, LOCAL_IP, sweep_only(), &mut plain, &cache, &clock).walk(&range_1_to_5());
    assert!(plain.frames().iter().all(|f| !f.is_reply()));

    let mut provoking = RecordingSender::new();
    let options = DiscoveryOptions {
        provoke: true,
        ..sweep_only()
    };
    RangeWalker::new(LOCAL_HW, LOCAL_IP, options, &mut provoking, &cache, &clock).walk(&range_1_to_5());
    let replies: Vec<Ipv4Addr> = provoking.frames().iter().filter(|f| f.is_reply()).map(|f| f.target_ip).collect();
    assert_eq!(replies.len(), 5);
    assert_eq!(replies[0], Ipv4Addr::new(10, 0, 0, 1));
}

#[test]
fn send_failures_do_not_abort_the_walk() {
    let mut link = FailingSender::new(Failure::Targets(vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]));
    let cache = support::cache(&[(Ipv4Addr::new(10, 0, 0, 2), support::mac(2))]);
    let clock = ManualClock::default();

    let hosts = RangeWalker::new(LOCAL_HW, LOCAL_IP, sweep_only(), &mut link, &cache, &clock).walk(&range_1_to_5());

    assert_eq!(link.refused, 2);
    assert_eq!(link.delivered.len(), 3);
    assert_eq!(hosts, vec![Host::new(Ipv4Addr::new(10, 0, 0, 2)).with_hardware(support::mac(2))]);
}

#[test]
fn service_publishes_vendor_labels_to_the_sink() -> anyhow::Result<()> {
    let vendors = StaticVendors(HashMap::from([(support::mac(2), "Acme Networks")]));
    let service = DiscoveryService::new(Box::new(vendors), DiscoveryOptions::default());
    let cache = support::cache(&[
        (Ipv4Addr::new(10, 0, 0, 2), support::mac(2)),
        (Ipv4Addr::new(10, 0, 0, 3), support::mac(3)),
    ]);
    let mut link = RecordingSender::new();
    let clock = ManualClock::default();

    let range = support::identity().address_range()?.with_bounds(1, 5)?;
    let hosts = service.perform_discovery(&support::identity(), &range, &mut link, &cache, &clock);

    let mut sink: Vec<(Ipv4Addr, Option<MacAddr>, String)> = Vec::new();
    service.publish(&hosts, &mut sink);

    assert_eq!(
        sink,
        vec![
            (Ipv4Addr::new(10, 0, 0, 2), Some(support::mac(2)), "Acme Networks".to_string()),
            (Ipv4Addr::new(10, 0, 0, 3), Some(support::mac(3)), UNKNOWN_VENDOR.to_string()),
        ]
    );
    Ok(())
}

#[test]
#[ignore]
fn discovery_on_the_live_interface() -> anyhow::Result<()> {
    let identity = arpscout_common::network::interface::get_interface(None)?;
    let service = DiscoveryService::new(Box::new(arpscout_core::vendors::MacOuiRepo), DiscoveryOptions::default());
    let range = identity.address_range()?;
    let hosts = service.discover(&identity, &range)?;
    assert!(hosts.windows(2).all(|w| w[0].address < w[1].address));
    Ok(())
}
