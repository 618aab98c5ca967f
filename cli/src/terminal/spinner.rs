use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crossterm::terminal;
use indicatif::{ProgressBar, ProgressStyle};

static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active() -> MutexGuard<'static, Option<ProgressBar>> {
    ACTIVE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A spinner shown while a blocking operation runs. Cleared on drop.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(msg: impl Into<String>, quiet: u8) -> Self {
        let pb: ProgressBar = match quiet {
            0 => ProgressBar::new_spinner(),
            _ => ProgressBar::hidden(),
        };
        let style: ProgressStyle = ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&[
                "▁▁▁▁▁",
                "▁▂▂▂▁",
                "▁▄▂▄▁",
                "▂▄▆▄▂",
                "▄▆█▆▄",
                "▂▄▆▄▂",
                "▁▄▂▄▁",
                "▁▂▂▂▁",
            ]);
        pb.set_style(style);
        pb.set_message(msg.into());
        pb.enable_steady_tick(Duration::from_millis(100));

        *active() = Some(pb.clone());
        Self { pb }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
        active().take();
    }
}

/// Log sink that suspends the active spinner around every line.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let text = match terminal::is_raw_mode_enabled() {
            Ok(true) => text.replace('\n', "\r\n"),
            _ => text.into_owned(),
        };

        let write_out = || -> std::io::Result<()> {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()
        };
        match active().as_ref() {
            Some(pb) => pb.suspend(write_out)?,
            None => write_out()?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}
