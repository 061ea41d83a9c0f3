//! Bloom post-processor: makes bright or emissive cells glow.
//!
//! Runs on the composited, lit frame:
//! 1. extract bloom sources (luminance at or above threshold, or emissive)
//! 2. blur them with a separable box blur (two iterations approximate a Gaussian)
//! 3. add the glow back, scaled by intensity
//!
//! Glow lands on the glyph color of glyph cells and on the background of
//! glyph-less cells, so the halo is visible around a bright glyph. Glyphs are
//! never changed.

use serde::{Deserialize, Serialize};

use crate::error::{finite, non_negative, ConfigError};
use crate::grid::FrameBuffer;
use crate::types::{
    Cell, Rgb, DEFAULT_BLOOM_BLUR_SCALE, DEFAULT_BLOOM_INTENSITY, DEFAULT_BLOOM_THRESHOLD,
};

const BLUR_ITERATIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub enabled: bool,
    /// Luminance cutoff, 0-255.
    pub threshold: u8,
    /// Blur kernel radius in cells, at least 1.
    pub blur_scale: u16,
    pub intensity: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_BLOOM_THRESHOLD,
            blur_scale: DEFAULT_BLOOM_BLUR_SCALE,
            intensity: DEFAULT_BLOOM_INTENSITY,
        }
    }
}

impl BloomConfig {
    pub fn new(
        enabled: bool,
        threshold: u8,
        blur_scale: u16,
        intensity: f32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            enabled,
            threshold,
            blur_scale,
            intensity,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blur_scale == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "blur_scale",
                value: 0.0,
            });
        }
        finite("bloom.intensity", non_negative("bloom.intensity", self.intensity)?)?;
        Ok(())
    }
}

/// Rec. 709 luminance in `[0, 255]`.
pub fn luminance(c: Rgb) -> f32 {
    0.2126 * c.r as f32 + 0.7152 * c.g as f32 + 0.0722 * c.b as f32
}

/// Color a cell contributes to the glow, if it is a bloom source.
///
/// Emissive cells bypass the threshold test.
pub fn bloom_source(cell: &Cell, threshold: u8) -> Option<Rgb> {
    let color = match (cell.glyph, cell.bg) {
        (Some(_), _) => cell.fg,
        (None, Some(bg)) => bg,
        (None, None) => return None,
    };
    if cell.emissive || luminance(color) >= threshold as f32 {
        Some(color)
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct BloomProcessor {
    glow: Vec<[f32; 3]>,
    scratch: Vec<[f32; 3]>,
}

impl BloomProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply bloom to `frame` in place. A disabled config leaves it untouched.
    ///
    /// Returns the number of bloom sources.
    pub fn apply(&mut self, config: &BloomConfig, frame: &mut FrameBuffer) -> usize {
        if !config.enabled {
            return 0;
        }
        let (w, h) = (frame.width() as usize, frame.height() as usize);
        if w == 0 || h == 0 {
            return 0;
        }

        self.glow.clear();
        self.glow.resize(w * h, [0.0; 3]);
        let mut sources = 0;
        for (glow, cell) in self.glow.iter_mut().zip(frame.cells()) {
            if let Some(c) = bloom_source(cell, config.threshold) {
                *glow = [c.r as f32, c.g as f32, c.b as f32];
                sources += 1;
            }
        }
        if sources == 0 {
            return 0;
        }

        let radius = config.blur_scale.max(1) as usize;
        self.scratch.clear();
        self.scratch.resize(w * h, [0.0; 3]);
        for _ in 0..BLUR_ITERATIONS {
            for y in 0..h {
                blur_line(&self.glow, &mut self.scratch, y * w, 1, w, radius);
            }
            for x in 0..w {
                blur_line(&self.scratch, &mut self.glow, x, w, h, radius);
            }
        }

        let k = config.intensity;
        if k <= 0.0 {
            return sources;
        }
        for (cell, glow) in frame.cells_mut().iter_mut().zip(&self.glow) {
            let add = [glow[0] * k, glow[1] * k, glow[2] * k];
            if add.iter().all(|&c| c < 0.5) {
                continue;
            }
            if cell.glyph.is_some() {
                cell.fg = add_clamped(cell.fg, add);
            } else {
                cell.bg = Some(add_clamped(cell.bg.unwrap_or(Rgb::BLACK), add));
            }
        }
        sources
    }
}

fn add_clamped(c: Rgb, add: [f32; 3]) -> Rgb {
    Rgb::from_f32_clamped(
        c.r as f32 + add[0],
        c.g as f32 + add[1],
        c.b as f32 + add[2],
    )
}

/// Normalized box blur of one row or column. Samples outside the line are zero.
fn blur_line(
    src: &[[f32; 3]],
    dst: &mut [[f32; 3]],
    start: usize,
    stride: usize,
    len: usize,
    radius: usize,
) {
    let norm = 1.0 / (2 * radius + 1) as f32;
    let at = |i: usize| src[start + i * stride];

    let mut sum = [0.0f32; 3];
    for i in 0..=radius.min(len - 1) {
        let v = at(i);
        sum[0] += v[0];
        sum[1] += v[1];
        sum[2] += v[2];
    }

    for i in 0..len {
        dst[start + i * stride] = [sum[0] * norm, sum[1] * norm, sum[2] * norm];
        if i >= radius {
            let v = at(i - radius);
            sum[0] -= v[0];
            sum[1] -= v[1];
            sum[2] -= v[2];
        }
        if i + radius + 1 < len {
            let v = at(i + radius + 1);
            sum[0] += v[0];
            sum[1] += v[1];
            sum[2] += v[2];
        }
    }
}
