//! Render context: the camera and post-processing settings for a frame.
//!
//! Passed explicitly into the pipeline so independent pipelines (and tests)
//! never share configuration.

use serde::{Deserialize, Serialize};

use crate::bloom::BloomConfig;
use crate::camera::{Camera, CameraMode};
use crate::error::ConfigError;
use crate::lighting::LightingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    pub camera: Camera,
    pub bloom: BloomConfig,
    pub lighting: LightingConfig,
}

impl RenderContext {
    pub fn new(camera: Camera, bloom: BloomConfig, lighting: LightingConfig) -> Self {
        Self {
            camera,
            bloom,
            lighting,
        }
    }

    /// Validate values that may have bypassed the constructors (e.g. deserialized).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.bloom.validate()?;
        Ok(())
    }

    /// Build a context from environment variables.
    ///
    /// - `CELLGLOW_CAMERA_MODE`: `orthographic` | `perspective`
    /// - `CELLGLOW_DEPTH_SCALE`: non-negative float
    /// - `CELLGLOW_BLOOM`: `1` / `true` enables bloom
    /// - `CELLGLOW_BLOOM_THRESHOLD`: 0-255
    /// - `CELLGLOW_BLOOM_BLUR_SCALE`: at least 1
    /// - `CELLGLOW_BLOOM_INTENSITY`: non-negative float
    /// - `CELLGLOW_LIGHTING`: `0` / `false` disables lighting
    /// - `CELLGLOW_STALE_FRAMES`: frames before a stale light is dropped
    ///
    /// Missing or invalid values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse_f32 = |key: &str| lookup(key).and_then(|s| s.trim().parse::<f32>().ok());
        let flag = |key: &str| {
            lookup(key).map(|v| {
                let v = v.trim().to_lowercase();
                v == "1" || v == "true"
            })
        };

        let mut ctx = Self::default();

        if let Some(mode) = lookup("CELLGLOW_CAMERA_MODE").and_then(|s| CameraMode::from_str(&s)) {
            ctx.camera.set_mode(mode);
        }
        if let Some(scale) = parse_f32("CELLGLOW_DEPTH_SCALE") {
            if ctx.camera.set_depth_scale(scale).is_err() {
                log::warn!("ignoring invalid CELLGLOW_DEPTH_SCALE={scale}");
            }
        }

        ctx.bloom.enabled = flag("CELLGLOW_BLOOM").unwrap_or(ctx.bloom.enabled);
        ctx.bloom.threshold = lookup("CELLGLOW_BLOOM_THRESHOLD")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(ctx.bloom.threshold);
        ctx.bloom.blur_scale = lookup("CELLGLOW_BLOOM_BLUR_SCALE")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&v: &u16| v >= 1)
            .unwrap_or(ctx.bloom.blur_scale);
        ctx.bloom.intensity = parse_f32("CELLGLOW_BLOOM_INTENSITY")
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(ctx.bloom.intensity);

        ctx.lighting.enabled = flag("CELLGLOW_LIGHTING").unwrap_or(ctx.lighting.enabled);
        ctx.lighting.stale_frame_limit = lookup("CELLGLOW_STALE_FRAMES")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(ctx.lighting.stale_frame_limit);

        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ctx_from(vars: &[(&str, &str)]) -> RenderContext {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RenderContext::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(ctx_from(&[]), RenderContext::default());
    }

    #[test]
    fn reads_overrides() {
        let ctx = ctx_from(&[
            ("CELLGLOW_CAMERA_MODE", "perspective"),
            ("CELLGLOW_DEPTH_SCALE", "0.25"),
            ("CELLGLOW_BLOOM", "true"),
            ("CELLGLOW_BLOOM_THRESHOLD", "180"),
            ("CELLGLOW_BLOOM_BLUR_SCALE", "8"),
            ("CELLGLOW_BLOOM_INTENSITY", "2.0"),
            ("CELLGLOW_LIGHTING", "0"),
            ("CELLGLOW_STALE_FRAMES", "5"),
        ]);
        assert_eq!(ctx.camera.mode(), CameraMode::Perspective);
        assert_eq!(ctx.camera.depth_scale(), 0.25);
        assert!(ctx.bloom.enabled);
        assert_eq!(ctx.bloom.threshold, 180);
        assert_eq!(ctx.bloom.blur_scale, 8);
        assert_eq!(ctx.bloom.intensity, 2.0);
        assert!(!ctx.lighting.enabled);
        assert_eq!(ctx.lighting.stale_frame_limit, 5);
    }

    #[test]
    fn invalid_values_fall_back() {
        let ctx = ctx_from(&[
            ("CELLGLOW_DEPTH_SCALE", "-3"),
            ("CELLGLOW_BLOOM_THRESHOLD", "999"),
            ("CELLGLOW_BLOOM_BLUR_SCALE", "0"),
            ("CELLGLOW_BLOOM_INTENSITY", "-1"),
        ]);
        assert_eq!(ctx, RenderContext::default());
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn deserialized_config_is_validated() {
        let ctx: RenderContext =
            serde_json::from_str(r#"{"camera":{"mode":"perspective","depth_scale":-1.0}}"#)
                .unwrap();
        assert!(ctx.validate().is_err());

        let ctx: RenderContext =
            serde_json::from_str(r#"{"bloom":{"enabled":true,"threshold":150}}"#).unwrap();
        assert!(ctx.validate().is_ok());
        assert!(ctx.bloom.enabled);
        assert_eq!(ctx.bloom.blur_scale, 4);
    }
}
