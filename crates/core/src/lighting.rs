//! Lighting engine: point-light illumination with occlusion-aware shadows.
//!
//! Everything here works in world cells. Occluders are gathered from the
//! `blocks_light` cells of visible, non-fixed layers; fixed (HUD) layers live in
//! screen space and never cast shadows into the world.
//!
//! Illumination is a per-channel multiplier: `0` is black, `1` leaves the base
//! color unchanged. The final color of a lit cell is
//! `base * (ambient + sum of light contributions)`, clamped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::layer::LayerRegistry;
use crate::light::{Light, LightRegistry};
use crate::types::{Rgb, DEFAULT_AMBIENT, DEFAULT_STALE_FRAME_LIMIT};

/// Lighting settings read at the start of each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub enabled: bool,
    /// Floor applied where no light reaches; `ambient / 255` per channel.
    pub ambient: Rgb,
    /// Frames a follow-bound light may outlive its target.
    pub stale_frame_limit: u32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ambient: DEFAULT_AMBIENT,
            stale_frame_limit: DEFAULT_STALE_FRAME_LIMIT,
        }
    }
}

/// Distance attenuation: `(1 - distance / radius) ^ exponent`, clamped to `[0, 1]`.
///
/// Exactly 1 at the light and 0 at or beyond `radius`.
pub fn falloff(distance: f32, radius: f32, exponent: f32) -> f32 {
    if radius <= 0.0 || distance >= radius || distance.is_nan() {
        return 0.0;
    }
    if distance <= 0.0 {
        return 1.0;
    }
    (1.0 - distance / radius).powf(exponent).clamp(0.0, 1.0)
}

/// Walk a Bresenham line from `from` to `to`.
///
/// Returns false if any cell strictly between the endpoints blocks light.
pub fn line_of_sight(from: (i32, i32), to: (i32, i32), blocks: impl Fn(i32, i32) -> bool) -> bool {
    // i64 so the error terms cannot overflow for far-apart endpoints.
    let (x0, y0) = (from.0 as i64, from.1 as i64);
    let (x1, y1) = (to.0 as i64, to.1 as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = x0;
    let mut y = y0;

    loop {
        if x == x1 && y == y1 {
            return true;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        // Every step stays between the endpoints, so it fits in i32.
        if (x != x1 || y != y1) && blocks(x as i32, y as i32) {
            return false;
        }
    }
}

/// Set of light-blocking world cells, rebuilt every frame.
///
/// Only blocking cells are stored, so occluders far apart in world space
/// cost nothing extra. The set keeps its capacity between frames.
#[derive(Debug, Default)]
pub struct OccluderMap {
    cells: HashSet<(i32, i32)>,
}

impl OccluderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&mut self, layers: &LayerRegistry) {
        self.cells.clear();
        for layer in layers.iter().filter(|l| l.is_visible() && !l.is_fixed()) {
            for (x, y, cell) in layer.grid().iter_filled() {
                if !cell.blocks_light {
                    continue;
                }
                // Cells pushed past the i32 range cannot be lit or hit by a ray.
                if let Some(pos) = layer.world_position(x, y) {
                    self.cells.insert(pos);
                }
            }
        }
    }

    pub fn is_blocking(&self, x: i32, y: i32) -> bool {
        self.cells.contains(&(x, y))
    }

    /// Number of blocking cells.
    pub fn count(&self) -> usize {
        self.cells.len()
    }
}

/// Accumulates light contributions at world cells.
#[derive(Debug, Default)]
pub struct LightingEngine {
    occluders: OccluderMap,
}

impl LightingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather occluders for this frame.
    pub fn prepare(&mut self, layers: &LayerRegistry) {
        self.occluders.rebuild(layers);
    }

    pub fn occluders(&self) -> &OccluderMap {
        &self.occluders
    }

    /// Contribution of one light at world cell `(x, y)`, per channel.
    pub fn contribution(&self, light: &Light, x: i32, y: i32) -> [f32; 3] {
        if light.is_inert() {
            return [0.0; 3];
        }
        let (lx, ly) = light.position();
        let (dx, dy) = (x as f32 - lx, y as f32 - ly);
        let distance = (dx * dx + dy * dy).sqrt();
        let attenuation = falloff(distance, light.radius(), light.falloff());
        if attenuation <= 0.0 {
            return [0.0; 3];
        }

        if light.casts_shadows() {
            let origin = (lx.floor() as i32, ly.floor() as i32);
            if !line_of_sight(origin, (x, y), |bx, by| self.occluders.is_blocking(bx, by)) {
                return [0.0; 3];
            }
        }

        let strength = attenuation * light.intensity();
        let [r, g, b] = light.color().to_unit();
        [r * strength, g * strength, b * strength]
    }

    /// Sum of every light's contribution at world cell `(x, y)`.
    pub fn illumination_at(&self, lights: &LightRegistry, x: i32, y: i32) -> [f32; 3] {
        let mut total = [0.0f32; 3];
        for (_, light) in lights.iter() {
            let c = self.contribution(light, x, y);
            total[0] += c[0];
            total[1] += c[1];
            total[2] += c[2];
        }
        total
    }
}

/// `base * (ambient + illumination)` per channel, clamped to `[0, 255]`.
pub fn shade(base: Rgb, ambient: [f32; 3], illumination: [f32; 3]) -> Rgb {
    Rgb::from_f32_clamped(
        base.r as f32 * (ambient[0] + illumination[0]),
        base.g as f32 * (ambient[1] + illumination[1]),
        base.b as f32 * (ambient[2] + illumination[2]),
    )
}
