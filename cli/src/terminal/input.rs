use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use arpscout_common::cancel::CancelSource;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Watches the keyboard for `q` or Ctrl-C while a long-running operation is
/// in progress.
pub struct InputHandle {
    rx: mpsc::Receiver<()>,
    tx: Option<mpsc::Sender<()>>,
    interrupted: AtomicBool,
    stop: Arc<AtomicBool>,
}

impl InputHandle {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            tx: Some(tx),
            interrupted: AtomicBool::new(false),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn start(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        if let Err(e) = enable_raw_mode() {
            warn!("Keyboard cancellation unavailable: {e}");
            return;
        }

        let stop = Arc::clone(&self.stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        debug!("Keyboard polling failed: {e}");
                        break;
                    }
                }
                if let Ok(Event::Key(key_event)) = event::read() {
                    let is_q = key_event.code == KeyCode::Char('q');
                    let is_ctrl_c = key_event.code == KeyCode::Char('c')
                        && key_event.modifiers.contains(KeyModifiers::CONTROL);

                    if (is_q || is_ctrl_c) && key_event.kind == KeyEventKind::Press {
                        let _ = tx.send(());
                        break;
                    }
                }
            }
            let _ = disable_raw_mode();
        });
    }

    pub fn should_interrupt(&self) -> bool {
        if self.rx.try_recv().is_ok() {
            self.interrupted.store(true, Ordering::Relaxed);
        }
        self.interrupted.load(Ordering::Relaxed)
    }
}

impl Default for InputHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSource for InputHandle {
    fn poll(&self) -> bool {
        self.should_interrupt()
    }
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = disable_raw_mode();
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
