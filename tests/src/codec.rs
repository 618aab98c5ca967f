use std::net::Ipv4Addr;

use arpscout_common::error::EngineError;
use arpscout_common::network::range::AddressRange;
use arpscout_protocols::arp::{ARP_FRAME_LEN, ArpFrame};
use pnet::packet::arp::ArpOperations;
use pnet::util::MacAddr;

use crate::support::{self, LOCAL_HW, LOCAL_IP};

#[test]
fn frames_survive_the_wire() {
    let frames = [
        ArpFrame::request(LOCAL_HW, LOCAL_IP, Ipv4Addr::new(10, 0, 0, 7)),
        ArpFrame::reply(LOCAL_HW, Ipv4Addr::new(10, 0, 0, 1), support::mac(7), Ipv4Addr::new(10, 0, 0, 7)),
        ArpFrame::reply(LOCAL_HW, LOCAL_IP, MacAddr::broadcast(), Ipv4Addr::new(10, 0, 0, 254)),
    ];

    for frame in frames {
        let bytes = frame.encode().unwrap();
        assert_eq!(bytes.len(), ARP_FRAME_LEN);
        assert_eq!(ArpFrame::decode(&bytes).unwrap(), frame);
    }
}

#[test]
fn request_has_the_standard_fixed_fields() {
    let bytes = ArpFrame::request(LOCAL_HW, LOCAL_IP, Ipv4Addr::new(10, 0, 0, 7)).encode().unwrap();
    assert_eq!(&bytes[12..14], &[0x08, 0x06]);
    assert_eq!(&bytes[14..22], &[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);

    let decoded = ArpFrame::decode(&bytes).unwrap();
    assert_eq!(decoded.opcode, ArpOperations::Request);
}

#[test]
fn short_input_is_malformed() {
    let result = ArpFrame::decode(&[0u8; 10]);
    assert!(matches!(result, Err(EngineError::MalformedFrame { expected: 42, actual: 10 })));
}

#[test]
fn range_invariant_is_enforced() {
    let base = Ipv4Addr::new(10, 0, 0, 0);
    assert!(matches!(AddressRange::new(base, 0, 5), Err(EngineError::InvalidRange { first: 0, last: 5 })));
    assert!(matches!(AddressRange::new(base, 6, 5), Err(EngineError::InvalidRange { .. })));
    assert!(matches!(AddressRange::new(base, 1, 255), Err(EngineError::InvalidRange { .. })));
    assert_eq!(AddressRange::new(base, 1, 254).unwrap().len(), 254);
}
