use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Rgb(rng.u8(..), rng.u8(..), rng.u8(..))
    }

    /// Channel-wise complement, `255 - c`.
    pub fn inverted(self) -> Self {
        Rgb(255 - self.0, 255 - self.1, 255 - self.2)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::Hex(hex.to_string()));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(ColorError::Hex(hex.to_string())),
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16).map_err(|_| ColorError::Hex(hex.to_string()))
        };

        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    fn from_rgb_function(s: &str) -> Result<Self, ColorError> {
        let inner = s
            .trim()
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ColorError::Rgb(s.to_string()))?;

        let channels = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ColorError::Rgb(s.to_string()))?;

        match channels.as_slice() {
            [r, g, b] => Ok(Rgb(*r, *g, *b)),
            _ => Err(ColorError::Rgb(s.to_string())),
        }
    }

    pub(crate) fn to_f32(self) -> [f32; 3] {
        [self.0 as f32, self.1 as f32, self.2 as f32]
    }
}

/// Formats as the `rgb(r,g,b)` string a web canvas accepts.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim_start().starts_with("rgb(") {
            Self::from_rgb_function(s)
        } else {
            Self::from_hex(s)
        }
    }
}

/// Inverts a `#rrggbb` / `#rgb` hex colour, returning lowercase `#rrggbb`.
pub fn invert_hex(hex: &str) -> Result<String, ColorError> {
    Ok(Rgb::from_hex(hex)?.inverted().to_hex())
}
