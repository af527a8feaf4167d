//! Color types
//!
//! Colors cross the display boundary as 24-bit RGB. The panel's native
//! format is 16-bit RGB565 sent high byte first; the engine packs each
//! color once when its palette is built, never per pixel per frame.

/// 24-bit RGB color stored as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb888(pub u32);

impl Rgb888 {
    pub const BLACK: Self = Self(0x000000);
    pub const WHITE: Self = Self(0xFFFFFF);

    /// Build a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Truncating conversion to the panel's packed format
    pub const fn to_rgb565(self) -> Rgb565 {
        let r = self.r() as u16;
        let g = self.g() as u16;
        let b = self.b() as u16;
        Rgb565(((r & 0xF8) << 8) | ((g & 0xFC) << 3) | (b >> 3))
    }
}

/// Packed 16-bit color in RGB565 layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);

    /// Wire order: high byte first
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

impl From<Rgb888> for Rgb565 {
    fn from(color: Rgb888) -> Self {
        color.to_rgb565()
    }
}

/// Parse a color string like `#2288FF`, `0x2288FF` or `2288FF`
///
/// Returns `None` for anything that is not exactly six hex digits after
/// the optional prefix.
pub fn parse_color(value: &str) -> Option<Rgb888> {
    let value = value.trim();
    let digits = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    u32::from_str_radix(digits, 16).ok().map(Rgb888)
}

/// Packed colors used by the eye compositor and decorations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Palette {
    pub sclera: Rgb565,
    pub iris: Rgb565,
    pub pupil: Rgb565,
    pub highlight: Rgb565,
    /// Shown through the rounded corners
    pub background: Rgb565,
    /// Eyelid rows inside the composited buffer
    pub lid: Rgb565,
    /// Same color for blink fills through `fill_rect`
    pub lid_fill: Rgb888,
    /// Closed line, eyebrows and crow's feet
    pub decoration: Rgb888,
}

impl Palette {
    /// Standard palette with a custom iris color
    pub const fn with_iris(iris: Rgb888) -> Self {
        Self {
            sclera: Rgb565::WHITE,
            iris: iris.to_rgb565(),
            pupil: Rgb565::BLACK,
            highlight: Rgb565::WHITE,
            background: Rgb565::BLACK,
            lid: Rgb565::BLACK,
            lid_fill: Rgb888::BLACK,
            decoration: Rgb888::WHITE,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::with_iris(crate::config::DEFAULT_IRIS_COLOR)
    }
}
