use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

use arpscout_common::config::Config;
use arpscout_common::success;
use arpscout_core::ports::{self, DEFAULT_PORTS, PortResult, PortState};
use colored::*;

use crate::terminal::format::{self, Detail};
use crate::terminal::print;
use crate::terminal::spinner::Spinner;

pub async fn ports(target: Ipv4Addr, timeout: Duration, cfg: &Config) -> anyhow::Result<()> {
    let start_time: Instant = Instant::now();
    let results: Vec<PortResult> = {
        let _spinner = Spinner::start(format!("Probing {} ports on {target}", DEFAULT_PORTS.len()), cfg.quiet);
        ports::probe_ports(IpAddr::V4(target), &DEFAULT_PORTS, timeout).await
    };

    let open: usize = results.iter().filter(|r| r.state == PortState::Open).count();
    match cfg.quiet {
        2 => {
            for result in results.iter().filter(|r| r.state == PortState::Open) {
                print::print(&format!("{target}:{}", result.port));
            }
        }
        _ => {
            print::tree_head(0, &target.to_string());
            let details: Vec<Detail> = results.iter().map(format::port_to_detail).collect();
            print::as_tree_one_level(details);
        }
    }

    success!(
        "Port probe complete: {} open in {:.2}s",
        open.to_string().green().bold(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
