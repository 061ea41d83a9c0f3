//! Core types module - shared data structures and constants
//!
//! This module defines the plain data passed between collaborators and the
//! rendering pipeline. Nothing here knows about layers, cameras or lights; it is
//! the vocabulary those parts are written in.
//!
//! # Cells
//!
//! A [`Cell`] is one addressable grid position:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `glyph` | Displayable character, or `None` |
//! | `fg` | Glyph color |
//! | `bg` | Optional background fill |
//! | `blocks_light` | Occludes light traversal |
//! | `emissive` | Always feeds the bloom pass |
//!
//! A cell with neither glyph nor background is *empty*: it never overwrites
//! anything when composited.
//!
//! # Defaults
//!
//! | Constant | Value |
//! |----------|-------|
//! | `DEFAULT_AMBIENT` | (30, 30, 40) |
//! | `DEFAULT_BLOOM_THRESHOLD` | 200 |
//! | `DEFAULT_BLOOM_BLUR_SCALE` | 4 |
//! | `DEFAULT_BLOOM_INTENSITY` | 1.0 |
//! | `DEFAULT_LIGHT_RADIUS` | 10.0 |
//! | `DEFAULT_STALE_FRAME_LIMIT` | 30 |
//!
//! # Examples
//!
//! ```
//! use cellglow_types::{Cell, Rgb};
//!
//! let torch = Cell::glyph('*', Rgb::new(255, 200, 80)).emissive();
//! assert!(!torch.is_empty());
//! assert!(torch.emissive);
//! assert!(Cell::default().is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ambient light color applied where no light reaches.
pub const DEFAULT_AMBIENT: Rgb = Rgb::new(30, 30, 40);

/// Luminance cutoff (0-255) above which a cell glows.
pub const DEFAULT_BLOOM_THRESHOLD: u8 = 200;

/// Blur kernel radius in cells.
pub const DEFAULT_BLOOM_BLUR_SCALE: u16 = 4;

/// Glow multiplier applied on recombination.
pub const DEFAULT_BLOOM_INTENSITY: f32 = 1.0;

/// Light radius in cells when none is given.
pub const DEFAULT_LIGHT_RADIUS: f32 = 10.0;

/// Frames a follow-bound light may outlive its target before it is dropped.
pub const DEFAULT_STALE_FRAME_LIMIT: u32 = 30;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels normalized to `[0, 1]`.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Build a color from floating point channels in `[0, 255]`, clamping each.
    pub fn from_f32_clamped(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }
}

fn clamp_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub glyph: Option<char>,
    pub fg: Rgb,
    pub bg: Option<Rgb>,
    pub blocks_light: bool,
    pub emissive: bool,
}

impl Cell {
    /// A glyph cell that neither blocks light nor glows on its own.
    pub const fn glyph(ch: char, fg: Rgb) -> Self {
        Self {
            glyph: Some(ch),
            fg,
            bg: None,
            blocks_light: false,
            emissive: false,
        }
    }

    /// A glyph-less background fill.
    pub const fn fill(bg: Rgb) -> Self {
        Self {
            glyph: None,
            fg: Rgb::BLACK,
            bg: Some(bg),
            blocks_light: false,
            emissive: false,
        }
    }

    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = Some(bg);
        self
    }

    pub const fn blocking(mut self) -> Self {
        self.blocks_light = true;
        self
    }

    pub const fn emissive(mut self) -> Self {
        self.emissive = true;
        self
    }

    /// Empty cells are transparent when composited.
    pub const fn is_empty(&self) -> bool {
        self.glyph.is_none() && self.bg.is_none()
    }
}

/// Unique, caller-chosen name of a window/layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry-assigned handle of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub u32);

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
