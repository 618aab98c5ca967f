use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 129, g: 199, b: 132 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 202, b: 40 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const IPV4_ADDR: Color = Color::TrueColor { r: 100, g: 181, b: 246 };
pub const IPV4_PREFIX: Color = Color::TrueColor { r: 66, g: 133, b: 244 };
pub const MAC_ADDR: Color = Color::TrueColor { r: 206, g: 147, b: 216 };
pub const VENDOR: Color = Color::TrueColor { r: 255, g: 183, b: 77 };

pub const PORT_OPEN: Color = Color::Green;
pub const PORT_CLOSED: Color = Color::BrightBlack;
