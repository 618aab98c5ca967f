/// Target used for milestone records, rendered with a dedicated symbol by the CLI.
pub const SUCCESS_TARGET: &str = "arpscout::success";

/// Logs a completed milestone (`[+]` in the terminal).
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: $crate::macros::SUCCESS_TARGET, $($arg)*)
    };
}
