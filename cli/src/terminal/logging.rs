use std::fmt;

use arpscout_common::macros::SUCCESS_TARGET;
use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::print::PRINT_TARGET;
use crate::terminal::spinner::SpinnerWriter;

/// Installs the global subscriber. `RUST_LOG` overrides the `-v` level.
pub fn init_logging(verbose: u8) {
    let level: &str = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let mut filter: EnvFilter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if let Ok(directive) = format!("{PRINT_TARGET}=info").parse() {
        filter = filter.add_directive(directive);
    }

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(ScoutFormatter)
        .with_writer(|| SpinnerWriter)
        .try_init();
    if let Err(e) = installed {
        eprintln!("failed to install the log subscriber: {e}");
    }
}

pub struct ScoutFormatter;

impl<S, N> FormatEvent<S, N> for ScoutFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        if meta.target() == PRINT_TARGET {
            let mut raw = RawMessage::default();
            event.record(&mut raw);
            return writeln!(writer, "{}", raw.0.unwrap_or_default());
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::INFO if meta.target() == SUCCESS_TARGET => ("[+]", |s| s.green().bold()),
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[*]", |s| s.cyan().bold()),
            Level::WARN => ("[-]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[derive(Default)]
struct RawMessage(Option<String>);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "raw_msg" {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "raw_msg" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}
