//! # Color
//!
//! Straight-alpha 8 bit colors, as handed to us by the toolbar. The toolbar speaks CSS, so we accept the handful
//! of CSS color syntaxes it actually produces rather than the whole zoo.

/// Swatches offered by the toolbar, in display order.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#2563eb", "#dc2626", "#16a34a", "#ca8a04", "#9333ea", "#c2410c", "#0891b2", "#be123c",
    "#374151", "#000000",
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("hex color must have 3, 6, or 8 digits, found {0}")]
    HexLength(usize),
    #[error("invalid hex digit in {0:?}")]
    HexDigit(String),
    #[error("expected {expected} components, found {found}")]
    ComponentCount { expected: usize, found: usize },
    #[error("invalid color component {0:?}")]
    Component(String),
    #[error("unrecognized color syntax")]
    Unrecognized,
}

/// A non-premultiplied sRGB color.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
    /// Format as `#rrggbb`, or `#rrggbbaa` if not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
    #[must_use]
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
    fn parse_hex(digits: &str) -> Result<Self, ColorParseError> {
        let bad_digit = || ColorParseError::HexDigit(digits.to_owned());
        // from_str_radix would also take a sign.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad_digit());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad_digit());
        let nibble = |i: usize| {
            u8::from_str_radix(&digits[i..=i], 16)
                .map(|n| n * 17)
                .map_err(|_| bad_digit())
        };
        match digits.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            len => Err(ColorParseError::HexLength(len)),
        }
    }
    /// Parse the inside of `rgb(...)` or `rgba(...)`.
    fn parse_functional(args: &str, has_alpha: bool) -> Result<Self, ColorParseError> {
        let parts: smallvec::SmallVec<[&str; 4]> = args.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(ColorParseError::ComponentCount {
                expected,
                found: parts.len(),
            });
        }
        let channel = |s: &str| {
            s.parse::<u8>()
                .map_err(|_| ColorParseError::Component(s.to_owned()))
        };
        let alpha = if has_alpha {
            let a: f32 = parts[3]
                .parse()
                .map_err(|_| ColorParseError::Component(parts[3].to_owned()))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(ColorParseError::Component(parts[3].to_owned()));
            }
            unit_to_u8(a)
        } else {
            255
        };
        Ok(Self::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }
}
/// `[0, 1]` to `[0, 255]`. Caller checks the range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(value: f32) -> u8 {
    (value * 255.0).round() as u8
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
impl std::str::FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(digits) = s.strip_prefix('#') {
            return Self::parse_hex(digits);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Self::parse_functional(args, true)
        } else if let Some(args) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Self::parse_functional(args, false)
        } else {
            Err(ColorParseError::Unrecognized)
        }
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod test {
    use super::{Color, ColorParseError, DEFAULT_PALETTE};

    #[test]
    fn hex_forms() {
        assert_eq!("#2563eb".parse(), Ok(Color::rgb(0x25, 0x63, 0xeb)));
        assert_eq!("#fff".parse(), Ok(Color::WHITE));
        assert_eq!("#ff000080".parse(), Ok(Color::rgba(255, 0, 0, 0x80)));
        assert_eq!(
            "#12345".parse::<Color>(),
            Err(ColorParseError::HexLength(5))
        );
        assert!(matches!(
            "#ggg".parse::<Color>(),
            Err(ColorParseError::HexDigit(_))
        ));
        for signed in ["#+f+f+f", "#+fffff", "#-1-1-1-1", "#ff+f"] {
            assert!(
                matches!(signed.parse::<Color>(), Err(ColorParseError::HexDigit(_))),
                "{signed} accepted"
            );
        }
    }
    #[test]
    fn functional_forms() {
        assert_eq!("rgb(1, 2, 3)".parse(), Ok(Color::rgb(1, 2, 3)));
        assert_eq!("RGBA(10,20,30,0.5)".parse(), Ok(Color::rgba(10, 20, 30, 128)));
        assert_eq!(
            "rgb(1, 2)".parse::<Color>(),
            Err(ColorParseError::ComponentCount {
                expected: 3,
                found: 2
            })
        );
        assert!("rgba(1, 2, 3, 2.0)".parse::<Color>().is_err());
        assert!("rgb(256, 0, 0)".parse::<Color>().is_err());
        assert_eq!("red".parse::<Color>(), Err(ColorParseError::Unrecognized));
    }
    #[test]
    fn palette_parses() {
        for swatch in DEFAULT_PALETTE {
            let color: Color = swatch.parse().unwrap();
            // Round trips through the display form.
            assert_eq!(color.to_string(), swatch);
        }
    }
}
