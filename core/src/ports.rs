//! TCP connect probing of a single host.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

pub const DEFAULT_PORTS: [u16; 13] = [20, 21, 22, 23, 25, 80, 137, 139, 443, 3389, 8080, 8443, 9090];
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Open,
    Closed,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortState::Open => f.write_str("open"),
            PortState::Closed => f.write_str("closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortResult {
    pub port: u16,
    pub state: PortState,
}

/// Tries each port in order. Refused and timed-out connects both count as closed.
pub async fn probe_ports(addr: IpAddr, ports: &[u16], connect_timeout: Duration) -> Vec<PortResult> {
    let mut results: Vec<PortResult> = Vec::with_capacity(ports.len());
    for &port in ports {
        let state = handshake_probe(SocketAddr::new(addr, port), connect_timeout).await;
        trace!("{addr}:{port} {state}");
        results.push(PortResult { port, state });
    }
    debug!(
        "{addr}: {} of {} port(s) open",
        results.iter().filter(|r| r.state == PortState::Open).count(),
        results.len()
    );
    results
}

pub async fn handshake_probe(socket_addr: SocketAddr, connect_timeout: Duration) -> PortState {
    match timeout(connect_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(_)) => PortState::Open,
        Ok(Err(_)) | Err(_) => PortState::Closed,
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
