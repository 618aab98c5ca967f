pub mod discover;
pub mod info;
pub mod ports;
pub mod spoof;

use std::net::Ipv4Addr;

use clap::{ArgAction, Parser, Subcommand};
use pnet::util::MacAddr;

#[derive(Parser)]
#[command(name = "arpscout", version)]
#[command(about = "Find hosts on the local segment over ARP and impersonate them.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Interface to use instead of the auto-selected LAN interface
    #[arg(short, long, global = true)]
    pub interface: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output (-q plain, -qq results only)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show this device's addresses and usable interfaces
    #[command(alias = "i")]
    Info,
    /// Discover hosts on the local segment
    #[command(alias = "d")]
    Discover {
        /// Pause after each candidate, in milliseconds
        #[arg(long, default_value_t = 10)]
        delay: u64,
        /// Also send a forged reply for every candidate
        #[arg(long)]
        provoke: bool,
        /// Skip the sweep pass
        #[arg(long)]
        no_sweep: bool,
        /// Skip the confirmation pass
        #[arg(long)]
        no_confirm: bool,
        /// First host octet to probe
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=254))]
        first: Option<u8>,
        /// Last host octet to probe
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=254))]
        last: Option<u8>,
    },
    /// Send forged replies to a host until cancelled
    #[command(alias = "s")]
    Spoof {
        target: Ipv4Addr,
        /// Hardware address of the target, skips resolution
        #[arg(long)]
        mac: Option<MacAddr>,
        /// Address to claim, defaults to this device's address
        #[arg(long)]
        spoof_ip: Option<Ipv4Addr>,
        /// Time between replies, in milliseconds
        #[arg(long, default_value_t = 2000)]
        interval: u64,
    },
    /// Probe common TCP ports on a host
    #[command(alias = "p")]
    Ports {
        target: Ipv4Addr,
        /// Connect timeout per port, in milliseconds
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
