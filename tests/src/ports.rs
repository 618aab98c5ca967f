use std::net::{IpAddr, Ipv4Addr};

use arpscout_core::ports::{self, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORTS, PortState};
use tokio::net::TcpListener;

#[tokio::test]
async fn results_follow_the_requested_port_order() -> anyhow::Result<()> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let open = listener.local_addr()?.port();

    let results = ports::probe_ports(IpAddr::V4(Ipv4Addr::LOCALHOST), &[open], DEFAULT_CONNECT_TIMEOUT).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].port, open);
    assert_eq!(results[0].state, PortState::Open);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn default_list_against_the_gateway() {
    let results = ports::probe_ports(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)), &DEFAULT_PORTS, DEFAULT_CONNECT_TIMEOUT).await;
    let probed: Vec<u16> = results.iter().map(|r| r.port).collect();
    assert_eq!(probed, DEFAULT_PORTS.to_vec());
}
