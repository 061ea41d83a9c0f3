//! Point lights and the registry that owns them.
//!
//! A light may follow a layer. The relation is a lookup by layer id each frame,
//! never a reference, so a removed target is just a miss: the light freezes at
//! its last resolved position and is dropped once it has been stale for longer
//! than the configured limit.

use crate::error::{finite, non_negative, ConfigError};
use crate::layer::LayerRegistry;
use crate::types::{LayerId, LightId, Rgb, DEFAULT_LIGHT_RADIUS};

/// Binds a light to a layer's origin plus a local offset.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowTarget {
    pub layer: LayerId,
    pub offset: (f32, f32),
}

/// A point light source.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    position: (f32, f32),
    radius: f32,
    color: Rgb,
    intensity: f32,
    falloff: f32,
    casts_shadows: bool,
    follow: Option<FollowTarget>,
    stale_frames: u32,
}

impl Light {
    /// White light of radius 10, intensity 1, linear falloff, casting shadows.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: (x, y),
            radius: DEFAULT_LIGHT_RADIUS,
            color: Rgb::WHITE,
            intensity: 1.0,
            falloff: 1.0,
            casts_shadows: true,
            follow: None,
            stale_frames: 0,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Distance falloff exponent (1 = linear, 2 = quadratic).
    pub fn with_falloff(mut self, falloff: f32) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn with_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }

    /// Follow `layer`'s origin, shifted by `(dx, dy)`.
    pub fn following(mut self, layer: impl Into<LayerId>, dx: f32, dy: f32) -> Self {
        self.follow = Some(FollowTarget {
            layer: layer.into(),
            offset: (dx, dy),
        });
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        finite("light.x", self.position.0)?;
        finite("light.y", self.position.1)?;
        non_negative("radius", self.radius)?;
        finite("radius", self.radius)?;
        finite("intensity", self.intensity)?;
        non_negative("falloff", self.falloff)?;
        finite("falloff", self.falloff)?;
        Ok(())
    }

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Move the light. A follow-bound light is re-positioned on the next frame.
    pub fn move_to(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.position = (x, y);
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<(), ConfigError> {
        self.radius = finite("radius", non_negative("radius", radius)?)?;
        Ok(())
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Zero or negative intensity switches the light off.
    pub fn set_intensity(&mut self, intensity: f32) -> Result<(), ConfigError> {
        self.intensity = finite("intensity", intensity)?;
        Ok(())
    }

    pub fn falloff(&self) -> f32 {
        self.falloff
    }

    pub fn set_falloff(&mut self, falloff: f32) -> Result<(), ConfigError> {
        self.falloff = finite("falloff", non_negative("falloff", falloff)?)?;
        Ok(())
    }

    pub fn casts_shadows(&self) -> bool {
        self.casts_shadows
    }

    pub fn set_casts_shadows(&mut self, casts_shadows: bool) {
        self.casts_shadows = casts_shadows;
    }

    pub fn follow_target(&self) -> Option<&FollowTarget> {
        self.follow.as_ref()
    }

    /// Detach from the follow target, keeping the current position.
    pub fn unfollow(&mut self) {
        self.follow = None;
        self.stale_frames = 0;
    }

    /// Inert lights contribute nothing but are not errors.
    pub fn is_inert(&self) -> bool {
        self.radius <= 0.0 || self.intensity <= 0.0
    }

    /// True while the follow target is missing.
    pub fn is_stale(&self) -> bool {
        self.stale_frames > 0
    }

    pub fn stale_frames(&self) -> u32 {
        self.stale_frames
    }
}

/// Registry of active lights, kept in insertion order.
#[derive(Debug, Default)]
pub struct LightRegistry {
    lights: Vec<(LightId, Light)>,
    next_id: u32,
}

impl LightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Register a light. Follow targets must name an existing layer.
    pub fn add_light(&mut self, light: Light, layers: &LayerRegistry) -> Result<LightId, ConfigError> {
        light.validate()?;

        let mut light = light;
        if let Some(target) = &light.follow {
            let layer = layers
                .layer(target.layer.as_str())
                .ok_or_else(|| ConfigError::UnknownLayer(target.layer.clone()))?;
            let (ox, oy) = layer.origin();
            light.position = (ox as f32 + target.offset.0, oy as f32 + target.offset.1);
        }

        let id = LightId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        log::debug!(
            "add light {id} at ({:.1}, {:.1}) radius={} intensity={}",
            light.position.0,
            light.position.1,
            light.radius,
            light.intensity
        );
        self.lights.push((id, light));
        Ok(id)
    }

    /// Returns true if the light existed.
    pub fn remove_light(&mut self, id: LightId) -> bool {
        let before = self.lights.len();
        self.lights.retain(|(lid, _)| *lid != id);
        before != self.lights.len()
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.iter().find(|(lid, _)| *lid == id).map(|(_, l)| l)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights
            .iter_mut()
            .find(|(lid, _)| *lid == id)
            .map(|(_, l)| l)
    }

    pub fn move_light(&mut self, id: LightId, x: f32, y: f32) -> Result<(), ConfigError> {
        self.light_mut(id)
            .ok_or(ConfigError::UnknownLight(id))?
            .move_to(x, y);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.lights.iter().map(|(id, l)| (*id, l))
    }

    /// Update follow-bound lights from their targets' current positions.
    ///
    /// Returns the number of lights dropped for exceeding `stale_limit`.
    pub fn resolve_positions(&mut self, layers: &LayerRegistry, stale_limit: u32) -> usize {
        for (id, light) in self.lights.iter_mut() {
            let Some(target) = &light.follow else {
                continue;
            };
            match layers.layer(target.layer.as_str()) {
                Some(layer) => {
                    let (ox, oy) = layer.origin();
                    light.position = (ox as f32 + target.offset.0, oy as f32 + target.offset.1);
                    if light.stale_frames > 0 {
                        log::debug!("light {id} target `{}` is back", target.layer);
                    }
                    light.stale_frames = 0;
                }
                None => {
                    if light.stale_frames == 0 {
                        log::warn!(
                            "light {id} lost its target `{}`; holding last position",
                            target.layer
                        );
                    }
                    light.stale_frames = light.stale_frames.saturating_add(1);
                }
            }
        }

        let before = self.lights.len();
        self.lights.retain(|(id, light)| {
            let keep = light.stale_frames <= stale_limit;
            if !keep {
                log::warn!("dropping light {id}: stale for {} frames", light.stale_frames);
            }
            keep
        });
        before - self.lights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerSpec;

    fn layers_with_player() -> LayerRegistry {
        let mut layers = LayerRegistry::new();
        layers
            .add_layer(LayerSpec::new("player", 1, 1).origin(5, 6))
            .unwrap();
        layers
    }

    #[test]
    fn rejects_negative_radius_and_unknown_target() {
        let layers = layers_with_player();
        let mut lights = LightRegistry::new();
        assert!(matches!(
            lights.add_light(Light::new(0.0, 0.0).with_radius(-1.0), &layers),
            Err(ConfigError::InvalidParameter { name: "radius", .. })
        ));
        assert_eq!(
            lights
                .add_light(Light::new(0.0, 0.0).following("ghost", 0.0, 0.0), &layers)
                .unwrap_err(),
            ConfigError::UnknownLayer(LayerId::from("ghost"))
        );
        assert!(lights.is_empty());
    }

    #[test]
    fn zeroed_lights_are_inert_not_errors() {
        let layers = layers_with_player();
        let mut lights = LightRegistry::new();
        let a = lights
            .add_light(Light::new(0.0, 0.0).with_radius(0.0), &layers)
            .unwrap();
        let b = lights
            .add_light(Light::new(0.0, 0.0).with_intensity(-1.0), &layers)
            .unwrap();
        assert!(lights.light(a).unwrap().is_inert());
        assert!(lights.light(b).unwrap().is_inert());
    }

    #[test]
    fn follow_bound_light_tracks_target() {
        let mut layers = layers_with_player();
        let mut lights = LightRegistry::new();
        let id = lights
            .add_light(Light::new(0.0, 0.0).following("player", 0.5, 0.0), &layers)
            .unwrap();
        assert_eq!(lights.light(id).unwrap().position(), (5.5, 6.0));

        layers.layer_mut("player").unwrap().set_origin(9, 1);
        lights.resolve_positions(&layers, 3);
        assert_eq!(lights.light(id).unwrap().position(), (9.5, 1.0));
    }

    #[test]
    fn dangling_target_freezes_then_drops() {
        let mut layers = layers_with_player();
        let mut lights = LightRegistry::new();
        let id = lights
            .add_light(Light::new(0.0, 0.0).following("player", 0.0, 0.0), &layers)
            .unwrap();
        layers.remove_layer("player");

        for frame in 1..=2 {
            assert_eq!(lights.resolve_positions(&layers, 2), 0);
            let light = lights.light(id).unwrap();
            assert!(light.is_stale());
            assert_eq!(light.stale_frames(), frame);
            assert_eq!(light.position(), (5.0, 6.0));
        }

        assert_eq!(lights.resolve_positions(&layers, 2), 1);
        assert!(lights.light(id).is_none());
    }

    #[test]
    fn returning_target_clears_stale_state() {
        let mut layers = layers_with_player();
        let mut lights = LightRegistry::new();
        let id = lights
            .add_light(Light::new(0.0, 0.0).following("player", 0.0, 0.0), &layers)
            .unwrap();
        layers.remove_layer("player");
        lights.resolve_positions(&layers, 10);
        layers
            .add_layer(LayerSpec::new("player", 1, 1).origin(1, 1))
            .unwrap();
        lights.resolve_positions(&layers, 10);
        let light = lights.light(id).unwrap();
        assert!(!light.is_stale());
        assert_eq!(light.position(), (1.0, 1.0));
    }

    #[test]
    fn remove_and_move() {
        let layers = LayerRegistry::new();
        let mut lights = LightRegistry::new();
        let id = lights.add_light(Light::new(1.0, 1.0), &layers).unwrap();
        lights.move_light(id, 4.0, 2.0).unwrap();
        assert_eq!(lights.light(id).unwrap().position(), (4.0, 2.0));
        assert!(lights.remove_light(id));
        assert_eq!(lights.move_light(id, 0.0, 0.0), Err(ConfigError::UnknownLight(id)));
    }
}
