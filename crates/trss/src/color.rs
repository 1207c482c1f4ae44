//! Colour normalisation.
//!
//! Profile colours are sent to the server as six uppercase hex digits
//! (`RRGGBB`). [`ColorNormalizer`] is the seam for turning whatever a user
//! typed into that form; [`CssColorNormalizer`] covers the common notations.

/// An opaque sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical wire form: `RRGGBB`, uppercase, no `#`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Turns a human-readable colour into canonical `RRGGBB`, or `None` when it
/// cannot be understood.
pub trait ColorNormalizer: Send + Sync {
    fn normalize(&self, input: &str) -> Option<String>;
}

/// Accepts `#RGB`, `#RRGGBB`, `#RRGGBBAA` (alpha dropped), the same without
/// `#`, `rgb(r, g, b)` and the CSS basic colour keywords, all
/// case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssColorNormalizer;

impl ColorNormalizer for CssColorNormalizer {
    fn normalize(&self, input: &str) -> Option<String> {
        parse_color(input).map(Rgb::to_hex)
    }
}

/// Parses the notations accepted by [`CssColorNormalizer`].
pub fn parse_color(input: &str) -> Option<Rgb> {
    let input = input.trim().to_ascii_lowercase();
    if let Some(rgb) = named(&input) {
        return Some(rgb);
    }
    if let Some(args) = input.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        return parse_rgb_function(args);
    }
    parse_hex(input.strip_prefix('#').unwrap_or(&input))
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|n| n * 17);
            Some(Rgb::new(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 | 8 => Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?)),
        _ => None,
    }
}

fn parse_rgb_function(args: &str) -> Option<Rgb> {
    let channels: Vec<u8> = args
        .split(',')
        .map(|part| part.trim().parse::<u8>().ok())
        .collect::<Option<_>>()?;
    match channels[..] {
        [r, g, b] => Some(Rgb::new(r, g, b)),
        _ => None,
    }
}

fn named(name: &str) -> Option<Rgb> {
    let (r, g, b) = match name {
        "black" => (0x00, 0x00, 0x00),
        "silver" => (0xC0, 0xC0, 0xC0),
        "gray" | "grey" => (0x80, 0x80, 0x80),
        "white" => (0xFF, 0xFF, 0xFF),
        "maroon" => (0x80, 0x00, 0x00),
        "red" => (0xFF, 0x00, 0x00),
        "purple" => (0x80, 0x00, 0x80),
        "fuchsia" | "magenta" => (0xFF, 0x00, 0xFF),
        "green" => (0x00, 0x80, 0x00),
        "lime" => (0x00, 0xFF, 0x00),
        "olive" => (0x80, 0x80, 0x00),
        "yellow" => (0xFF, 0xFF, 0x00),
        "navy" => (0x00, 0x00, 0x80),
        "blue" => (0x00, 0x00, 0xFF),
        "teal" => (0x00, 0x80, 0x80),
        "aqua" | "cyan" => (0x00, 0xFF, 0xFF),
        "orange" => (0xFF, 0xA5, 0x00),
        _ => return None,
    };
    Some(Rgb::new(r, g, b))
}
