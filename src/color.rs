//! Color model: 24-bit colors, RGBA colors, foreground/background pairs, gradients.

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A 24-bit color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `rrggbb` hex string. A leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::InvalidHexColor(hex.to_owned()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| Error::InvalidHexColor(hex.to_owned()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Channel-wise addition that wraps on overflow.
    pub const fn wrapping_add(self, other: Color) -> Color {
        Color {
            r: self.r.wrapping_add(other.r),
            g: self.g.wrapping_add(other.g),
            b: self.b.wrapping_add(other.b),
        }
    }

    /// Linear interpolation toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Composite `over` onto this color with opacity `alpha` in `[0, 1]`.
    pub fn composite(self, over: Color, alpha: f64) -> Color {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |buf: u8, c: u8| (buf as f64 + (c as f64 - buf as f64) * a) as u8;
        Color {
            r: mix(self.r, over.r),
            g: mix(self.g, over.g),
            b: mix(self.b, over.b),
        }
    }
}

// ---------------------------------------------------------------------------
// AColor
// ---------------------------------------------------------------------------

/// A color with an alpha channel, used by graphic textures.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl AColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    pub const fn opaque(color: Color) -> Self {
        Self { r: color.r, g: color.g, b: color.b, a: 255 }
    }

    /// The color without its alpha channel.
    pub const fn rgb(self) -> Color {
        Color { r: self.r, g: self.g, b: self.b }
    }
}

impl From<Color> for AColor {
    fn from(color: Color) -> Self {
        AColor::opaque(color)
    }
}

// ---------------------------------------------------------------------------
// ColorPair
// ---------------------------------------------------------------------------

/// Foreground and background colors of one terminal cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorPair {
    pub fg: Color,
    pub bg: Color,
}

impl ColorPair {
    /// Build a pair from a foreground and a background color.
    pub const fn from_colors(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    pub const fn fg(self) -> Color {
        self.fg
    }

    pub const fn bg(self) -> Color {
        self.bg
    }

    /// The six channels in `(fg r, g, b, bg r, g, b)` order.
    pub const fn channels(self) -> [u8; 6] {
        [self.fg.r, self.fg.g, self.fg.b, self.bg.r, self.bg.g, self.bg.b]
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const BLACK: Color = Color::new(0, 0, 0);
pub const WHITE: Color = Color::new(255, 255, 255);
pub const RED: Color = Color::new(255, 0, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
pub const BLUE: Color = Color::new(0, 0, 255);
pub const YELLOW: Color = Color::new(255, 255, 0);
pub const CYAN: Color = Color::new(0, 255, 255);
pub const MAGENTA: Color = Color::new(255, 0, 255);
pub const DARK_GRAY: Color = Color::new(64, 64, 64);
pub const LIGHT_GRAY: Color = Color::new(192, 192, 192);

pub const WHITE_ON_BLACK: ColorPair = ColorPair::from_colors(WHITE, BLACK);
pub const BLACK_ON_WHITE: ColorPair = ColorPair::from_colors(BLACK, WHITE);

pub const TRANSPARENT: AColor = AColor::new(0, 0, 0, 0);

// ---------------------------------------------------------------------------
// Gradients
// ---------------------------------------------------------------------------

/// `n` colors evenly interpolated from `start` to `end`, both included.
pub fn gradient(start: Color, end: Color, n: usize) -> Vec<Color> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start.lerp(end, i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// `n` color pairs with both channels interpolated independently.
pub fn pair_gradient(start: ColorPair, end: ColorPair, n: usize) -> Vec<ColorPair> {
    gradient(start.fg, end.fg, n)
        .into_iter()
        .zip(gradient(start.bg, end.bg, n))
        .map(|(fg, bg)| ColorPair::from_colors(fg, bg))
        .collect()
}

/// `n` fully saturated colors walking once around the hue circle.
pub fn rainbow_gradient(n: usize) -> Vec<Color> {
    (0..n).map(|i| hue_to_rgb(i as f64 / n as f64)).collect()
}

fn hue_to_rgb(hue: f64) -> Color {
    let h = (hue.fract() * 6.0).max(0.0);
    let f = h.fract();
    let up = (255.0 * f).round() as u8;
    let down = (255.0 * (1.0 - f)).round() as u8;
    match h as u8 {
        0 => Color::new(255, up, 0),
        1 => Color::new(down, 255, 0),
        2 => Color::new(0, 255, up),
        3 => Color::new(0, down, 255),
        4 => Color::new(up, 0, 255),
        _ => Color::new(255, 0, down),
    }
}

// ---------------------------------------------------------------------------
// ColorTheme
// ---------------------------------------------------------------------------

/// Palette that themable widgets read in [`Widget::update_theme`](crate::widget::Widget::update_theme).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorTheme {
    pub primary_fg: Color,
    pub primary_bg: Color,
    pub primary_fg_light: Color,
    pub primary_bg_light: Color,
    pub primary_fg_dark: Color,
    pub primary_bg_dark: Color,
    pub secondary_fg: Color,
    pub secondary_bg: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            primary_fg: Color::new(0xf2, 0xe7, 0xd5),
            primary_bg: Color::new(0x27, 0x2b, 0x33),
            primary_fg_light: Color::new(0xfc, 0xf7, 0xee),
            primary_bg_light: Color::new(0x3a, 0x40, 0x4b),
            primary_fg_dark: Color::new(0xd8, 0xca, 0xb3),
            primary_bg_dark: Color::new(0x1a, 0x1d, 0x23),
            secondary_fg: Color::new(0xff, 0xff, 0xff),
            secondary_bg: Color::new(0x4f, 0x6d, 0xa6),
        }
    }
}

impl ColorTheme {
    /// The primary foreground on the primary background.
    pub const fn primary_color_pair(&self) -> ColorPair {
        ColorPair::from_colors(self.primary_fg, self.primary_bg)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
