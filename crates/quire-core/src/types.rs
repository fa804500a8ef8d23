//! Core value types shared by the layout and rendering crates.

use glam::DVec2;

/// Size of an A4 page, in millimeters.
pub const PAGE_SIZE_A4: DVec2 = DVec2::new(210.0, 297.0);

/// Size of a US Letter page, in millimeters.
pub const PAGE_SIZE_LETTER: DVec2 = DVec2::new(215.9, 279.4);

/// A color value.
///
/// Colors are passed through to the raster engine untouched; no color
/// management happens here.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGBA values.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create from hex string (e.g., "#FF5733", "FF5733", "#f00" or "#ff000077").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(Self::from_rgba8(rgb[0], rgb[1], rgb[2], 255))
            }
            6 => Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::from_rgba8(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => None,
        }
    }

    /// Parse a color from markup: a hex value or one of the basic color names.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('#') {
            return Self::from_hex(value);
        }
        let named = match value.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(1.0, 0.0, 0.0),
            "green" => Self::from_rgba8(0, 128, 0, 255),
            "lime" => Self::rgb(0.0, 1.0, 0.0),
            "blue" => Self::rgb(0.0, 0.0, 1.0),
            "yellow" => Self::rgb(1.0, 1.0, 0.0),
            "cyan" | "aqua" => Self::rgb(0.0, 1.0, 1.0),
            "magenta" | "fuchsia" => Self::rgb(1.0, 0.0, 1.0),
            "gray" | "grey" => Self::from_rgba8(128, 128, 128, 255),
            "silver" => Self::from_rgba8(192, 192, 192, 255),
            "maroon" => Self::from_rgba8(128, 0, 0, 255),
            "navy" => Self::from_rgba8(0, 0, 128, 255),
            "olive" => Self::from_rgba8(128, 128, 0, 255),
            "purple" => Self::from_rgba8(128, 0, 128, 255),
            "teal" => Self::from_rgba8(0, 128, 128, 255),
            "orange" => Self::from_rgba8(255, 165, 0, 255),
            "transparent" | "none" => Self::TRANSPARENT,
            _ => return Self::from_hex(value),
        };
        Some(named)
    }

    /// Convert to 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    // Common colors
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Translucent red used for debug object borders (`#ff000077`).
    pub const DEBUG_BORDER: Self = Self::rgba(1.0, 0.0, 0.0, 119.0 / 255.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Text attributes toggled by markup tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Attribute {
    Bold,
    Italic,
    Underline,
}

/// A small set of text attributes.
pub type Attributes = smallvec::SmallVec<[Attribute; 3]>;

/// How an image object places its source image within its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FitMode {
    /// Stretch to the exact bounds, ignoring aspect ratio
    Stretch,
    /// Preserve aspect ratio and center within the bounds
    #[default]
    Fit,
}

/// Default text style used when no markup tag overrides it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextDefaults {
    /// Font name
    pub font: String,
    /// Font size in points
    pub size: f64,
    /// Foreground color
    pub color: Color,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font: "DejaVu-Sans".to_string(),
            size: 12.0,
            color: Color::BLACK,
        }
    }
}
