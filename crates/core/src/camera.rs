//! Camera projector: per-layer screen offsets from the camera state.
//!
//! One uniform offset function covers both layer kinds: fixed layers get no
//! offset, everything else is scaled by the depth factor of the current mode.

use serde::{Deserialize, Serialize};

use crate::error::{finite, non_negative, ConfigError};
use crate::layer::Layer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Every non-fixed layer pans 1:1 with the camera.
    #[default]
    Orthographic,
    /// Deeper layers lag behind the camera (parallax).
    Perspective,
}

impl CameraMode {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "orthographic" | "ortho" => Some(CameraMode::Orthographic),
            "perspective" => Some(CameraMode::Perspective),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::Orthographic => "orthographic",
            CameraMode::Perspective => "perspective",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Orthographic => CameraMode::Perspective,
            CameraMode::Perspective => CameraMode::Orthographic,
        }
    }
}

/// How far the view has scrolled for a layer, in (possibly fractional) cells.
///
/// The compositor subtracts the rounded offset from a layer's origin, so
/// moving the camera right moves content left on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    /// Nearest whole cell.
    pub fn rounded(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    x: f32,
    y: f32,
    mode: CameraMode,
    depth_scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            mode: CameraMode::Orthographic,
            depth_scale: 0.1,
        }
    }
}

impl Camera {
    pub fn new(x: f32, y: f32, mode: CameraMode, depth_scale: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            x: finite("camera.x", x)?,
            y: finite("camera.y", y)?,
            mode,
            depth_scale: non_negative("depth_scale", depth_scale)?,
        })
    }

    /// Re-check values that bypassed the constructor (e.g. deserialized).
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("camera.x", self.x)?;
        finite("camera.y", self.y)?;
        non_negative("depth_scale", self.depth_scale)?;
        Ok(())
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.x = x;
            self.y = y;
        }
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.set_position(self.x + dx, self.y + dy);
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        log::debug!("camera mode -> {}", mode.as_str());
        self.mode = mode;
    }

    pub fn depth_scale(&self) -> f32 {
        self.depth_scale
    }

    pub fn set_depth_scale(&mut self, depth_scale: f32) -> Result<(), ConfigError> {
        self.depth_scale = non_negative("depth_scale", depth_scale)?;
        Ok(())
    }

    /// `1 / (1 + depth * depth_scale)` in perspective mode, `1` otherwise.
    ///
    /// Equal to 1 at depth 0 and decreasing toward 0 as depth grows.
    pub fn depth_factor(&self, depth: f32) -> f32 {
        match self.mode {
            CameraMode::Orthographic => 1.0,
            CameraMode::Perspective => {
                if self.depth_scale == 0.0 {
                    return 1.0;
                }
                let denom = 1.0 + depth.max(0.0) * self.depth_scale;
                if denom.is_infinite() {
                    0.0
                } else {
                    1.0 / denom
                }
            }
        }
    }

    /// Offset for a layer described by its `fixed` flag and `depth`.
    pub fn offset_for(&self, fixed: bool, depth: f32) -> Offset {
        if fixed {
            return Offset::ZERO;
        }
        let factor = self.depth_factor(depth);
        Offset {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn layer_offset(&self, layer: &Layer) -> Offset {
        self.offset_for(layer.is_fixed(), layer.depth())
    }
}
