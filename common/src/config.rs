/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Name of the interface to use instead of the auto-selected LAN interface.
    pub interface: Option<String>,
    /// Suppresses headers and decorations. `2` prints results only.
    pub quiet: u8,
    /// Skips the banner at startup.
    pub no_banner: bool,
}
