use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A polled "operator requested stop" signal.
///
/// The engine checks it once per loop iteration; it never interrupts a frame
/// that is already being transmitted.
pub trait CancelSource {
    fn poll(&self) -> bool;
}

impl CancelSource for AtomicBool {
    fn poll(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: CancelSource + ?Sized> CancelSource for Arc<T> {
    fn poll(&self) -> bool {
        (**self).poll()
    }
}

impl<T: CancelSource + ?Sized> CancelSource for &T {
    fn poll(&self) -> bool {
        (**self).poll()
    }
}

/// A source that never cancels.
pub struct Never;

impl CancelSource for Never {
    fn poll(&self) -> bool {
        false
    }
}
