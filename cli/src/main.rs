mod commands;
mod terminal;

use std::time::Duration;

use arpscout_common::config::Config;
use arpscout_core::spoof::SpoofOptions;
use arpscout_core::walker::DiscoveryOptions;
use commands::{CommandLine, Commands, discover, info, ports, spoof};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = Config {
        interface: commands.interface,
        quiet: commands.quiet,
        no_banner: commands.no_banner,
    };
    print::banner(cfg.no_banner, cfg.quiet);

    match commands.command {
        Commands::Info => {
            print::header("about this device", cfg.quiet);
            info::info(&cfg)
        }
        Commands::Discover { delay, provoke, no_sweep, no_confirm, first, last } => {
            print::header("getting ready for discovery", cfg.quiet);
            let options = DiscoveryOptions {
                inter_request_delay: Duration::from_millis(delay),
                provoke,
                sweep_pass: !no_sweep,
                confirm_pass: !no_confirm,
            };
            discover::discover(options, first, last, &cfg).await
        }
        Commands::Spoof { target, mac, spoof_ip, interval } => {
            print::header("spoofing", cfg.quiet);
            let options = SpoofOptions {
                interval: Duration::from_millis(interval),
                spoof_ip,
            };
            spoof::spoof(target, mac, options, &cfg).await
        }
        Commands::Ports { target, timeout } => {
            print::header("probing ports", cfg.quiet);
            ports::ports(target, Duration::from_millis(timeout), &cfg).await
        }
    }
}
