use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use anyhow::Context;
use arpscout_common::config::Config;
use arpscout_common::network::host::Host;
use arpscout_common::network::interface::{self, LocalIdentity};
use arpscout_common::network::range::AddressRange;
use arpscout_common::sink::HostSink;
use arpscout_common::success;
use arpscout_core::discovery::DiscoveryService;
use arpscout_core::ports::DEFAULT_CONNECT_TIMEOUT;
use arpscout_core::spoof::SpoofOptions;
use arpscout_core::vendors::MacOuiRepo;
use arpscout_core::walker::DiscoveryOptions;
use colored::*;
use console::Term;
use pnet::util::MacAddr;

use crate::commands::{info, ports, spoof};
use crate::mprint;
use crate::terminal::spinner::Spinner;
use crate::terminal::{colors, format, print};

pub async fn discover(options: DiscoveryOptions, first: Option<u8>, last: Option<u8>, cfg: &Config) -> anyhow::Result<()> {
    info::warn_if_unprivileged();
    let identity: LocalIdentity =
        interface::get_interface(cfg.interface.as_deref()).context("acquiring a network interface")?;
    info::print_identity(&identity, cfg.quiet);

    let derived: AddressRange = identity.address_range()?;
    let range: AddressRange = derived
        .with_bounds(first.unwrap_or(derived.first()), last.unwrap_or(derived.last()))
        .context("applying --first/--last")?;

    let service = DiscoveryService::new(Box::new(MacOuiRepo), options);
    let start_time: Instant = Instant::now();
    let (service, hosts) = {
        let _spinner = Spinner::start(format!("Walking {range}"), cfg.quiet);
        tokio::task::spawn_blocking(move || {
            let hosts = service.discover(&identity, &range);
            (service, hosts)
        })
        .await
        .context("discovery task aborted")?
    };
    let hosts: Vec<Host> = hosts.context("running discovery")?;

    if hosts.is_empty() {
        print::header("zero hosts detected", cfg.quiet);
        print::no_results();
        return Ok(());
    }

    print::header("network discovery", cfg.quiet);
    let mut sink = TerminalSink::new(cfg.quiet);
    service.publish(&hosts, &mut sink);
    print_summary(hosts.len(), start_time.elapsed(), cfg);

    if cfg.quiet == 0 && Term::stdout().is_term() {
        after_scan(&hosts, cfg).await?;
    }
    Ok(())
}

/// Prints each host as an indexed tree, or one line per host when `-qq`.
struct TerminalSink {
    quiet: u8,
    emitted: usize,
}

impl TerminalSink {
    fn new(quiet: u8) -> Self {
        Self { quiet, emitted: 0 }
    }
}

impl HostSink for TerminalSink {
    fn emit(&mut self, address: Ipv4Addr, hardware: Option<MacAddr>, label: &str) {
        match self.quiet {
            2 => {
                let mac: String = hardware.map(|mac| mac.to_string()).unwrap_or_default();
                print::print(&format!("{address}\t{mac}\t{label}"));
            }
            _ => {
                if self.emitted > 0 {
                    mprint!();
                }
                print::tree_head(self.emitted, label);
                print::as_tree_one_level(format::host_details(address, hardware, label));
            }
        }
        self.emitted += 1;
    }
}

fn print_summary(hosts_len: usize, total_time: Duration, cfg: &Config) {
    let active_hosts: ColoredString = format!("{hosts_len} active hosts").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Discovery Complete: {active_hosts} identified in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => success!("{}", output),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Ports,
    Spoof,
}

/// Lets the operator pick a host from the list and act on it.
async fn after_scan(hosts: &[Host], cfg: &Config) -> anyhow::Result<()> {
    let term = Term::stdout();

    print::print_status(format!("Select a host [0-{}] or press Enter to quit", hosts.len() - 1));
    let Some(host) = parse_selection(&term.read_line()?, hosts) else {
        return Ok(());
    };

    print::print_status("Action: [p]orts or [s]poof");
    match parse_action(&term.read_line()?) {
        Some(Action::Ports) => ports::ports(host.address, DEFAULT_CONNECT_TIMEOUT, cfg).await,
        Some(Action::Spoof) => spoof::spoof(host.address, host.hardware, SpoofOptions::default(), cfg).await,
        None => Ok(()),
    }
}

fn parse_selection(line: &str, hosts: &[Host]) -> Option<Host> {
    line.trim().parse::<usize>().ok().and_then(|idx| hosts.get(idx).copied())
}

fn parse_action(line: &str) -> Option<Action> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "ports" => Some(Action::Ports),
        "s" | "spoof" => Some(Action::Spoof),
        _ => None,
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
