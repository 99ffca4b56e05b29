use std::collections::HashMap;
use std::fmt;

use crate::error::PaletteError;

/// An sRGB color, kept as plain bytes so any renderer can consume it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
    pub const GREEN: Color = Color::rgb(0x00, 0x80, 0x00);
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rrggbb` string.
    pub fn from_hex(value: &str) -> Result<Self, PaletteError> {
        value
            .strip_prefix('#')
            .filter(|digits| digits.len() == 6 && digits.is_ascii())
            .and_then(parse_channels)
            .ok_or_else(|| PaletteError::InvalidHex(value.to_owned()))
    }
}

fn parse_channels(digits: &str) -> Option<Color> {
    let channel = |range| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Declarative mapping from an attribute value to its display color, with
/// an explicit fallback. Validated when built, so rendering never has to
/// deal with a bad table.
#[derive(Clone, Debug)]
pub struct Palette {
    entries: HashMap<String, Color>,
    fallback: Color,
}

impl Palette {
    pub fn new<I, S>(entries: I, fallback: Color) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut table = HashMap::new();
        for (value, hex) in entries {
            let color = Color::from_hex(hex.as_ref())?;
            if table.insert(value.as_ref().to_owned(), color).is_some() {
                return Err(PaletteError::DuplicateEntry(value.as_ref().to_owned()));
            }
        }
        Ok(Self {
            entries: table,
            fallback,
        })
    }

    pub fn color_for(&self, value: &str) -> Color {
        self.entries.get(value).copied().unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> Color {
        self.fallback
    }
}

impl Default for Palette {
    /// The stock state coloring: TN red, MA blue, WB green, Delhi yellow,
    /// everything else black.
    fn default() -> Self {
        let entries = [
            ("TN".to_owned(), Color::RED),
            ("MA".to_owned(), Color::BLUE),
            ("WB".to_owned(), Color::GREEN),
            ("Delhi".to_owned(), Color::YELLOW),
        ];
        Self {
            entries: entries.into_iter().collect(),
            fallback: Color::BLACK,
        }
    }
}
