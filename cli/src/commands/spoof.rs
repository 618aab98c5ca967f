use std::net::Ipv4Addr;

use anyhow::Context;
use arpscout_common::config::Config;
use arpscout_common::network::interface::{self, LocalIdentity};
use arpscout_core::spoof::{self, SpoofOptions, SpoofReport};
use colored::*;
use pnet::util::MacAddr;

use crate::commands::info;
use crate::terminal::input::InputHandle;
use crate::terminal::{colors, print};

pub async fn spoof(target: Ipv4Addr, mac: Option<MacAddr>, options: SpoofOptions, cfg: &Config) -> anyhow::Result<()> {
    info::warn_if_unprivileged();
    let identity: LocalIdentity =
        interface::get_interface(cfg.interface.as_deref()).context("acquiring a network interface")?;
    info::print_identity(&identity, cfg.quiet);

    print::print_status("Press 'q' or Ctrl-C to stop");
    let report: SpoofReport = tokio::task::spawn_blocking(move || {
        let mut input = InputHandle::new();
        input.start();
        spoof::run_spoof(&identity, options, target, mac, &input)
    })
    .await
    .context("spoof task aborted")?
    .with_context(|| format!("spoofing {target}"))?;

    print_report(&report, cfg.quiet);
    Ok(())
}

fn print_report(report: &SpoofReport, quiet: u8) {
    print::header("session report", quiet);
    print::aligned_line("Target", report.target_ip.to_string().color(colors::IPV4_ADDR));
    print::aligned_line("Claimed", report.spoof_ip.to_string().color(colors::IPV4_ADDR));
    print::aligned_line("Replies", report.sent.to_string().bold());
    print::aligned_line("Stopped", report.reason.to_string());
}
