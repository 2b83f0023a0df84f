// Color values stored on text runs
// Parses the CSS color forms the editing surface produces and writes them back
// in one canonical spelling

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A text or highlight color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    Rgb(u8, u8, u8),
    Inherit,
    Transparent,
}

/// Error returned when a string is not a color we understand
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized color: {0:?}")]
pub struct ParseColorError(pub String);

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0x00, 0x00, 0x00)),
    ("white", (0xff, 0xff, 0xff)),
    ("red", (0xff, 0x00, 0x00)),
    ("green", (0x00, 0x80, 0x00)),
    ("blue", (0x00, 0x00, 0xff)),
    ("yellow", (0xff, 0xff, 0x00)),
    ("orange", (0xff, 0xa5, 0x00)),
    ("purple", (0x80, 0x00, 0x80)),
    ("gray", (0x80, 0x80, 0x80)),
    ("grey", (0x80, 0x80, 0x80)),
];

fn hex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#([0-9a-f]{3}|[0-9a-f]{6})$").expect("valid hex regex"))
}

fn rgb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$",
        )
        .expect("valid rgb regex")
    })
}

impl Color {
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);

    /// Parse any supported CSS color spelling (`#rgb`, `#rrggbb`, `rgb()`, `rgba()`,
    /// a handful of names, `inherit`, `transparent`)
    pub fn parse(input: &str) -> Option<Color> {
        let value = input.trim().to_ascii_lowercase();

        match value.as_str() {
            "inherit" => return Some(Color::Inherit),
            "transparent" => return Some(Color::Transparent),
            _ => {}
        }

        if let Some(caps) = hex_re().captures(&value) {
            let digits = &caps[1];
            let channel = |s: &str| u8::from_str_radix(s, 16).ok();
            return if digits.len() == 3 {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
            } else {
                Some(Color::Rgb(
                    channel(&digits[0..2])?,
                    channel(&digits[2..4])?,
                    channel(&digits[4..6])?,
                ))
            };
        }

        if let Some(caps) = rgb_re().captures(&value) {
            let channel = |i: usize| caps[i].parse::<u8>().ok();
            let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);
            if let Some(alpha) = caps.get(4)
                && alpha.as_str().parse::<f32>().ok()? == 0.0
            {
                return Some(Color::Transparent);
            }
            return Some(Color::Rgb(r, g, b));
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, (r, g, b))| Color::Rgb(*r, *g, *b))
    }

    pub fn is_black(&self) -> bool {
        *self == Color::BLACK
    }

    pub fn is_white(&self) -> bool {
        *self == Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            Color::Inherit => f.write_str("inherit"),
            Color::Transparent => f.write_str("transparent"),
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
