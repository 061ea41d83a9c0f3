//! Per-frame pipeline: camera projection, compositing, lighting, bloom.
//!
//! Runs synchronously once per frame. Nothing in here can fail: every bad
//! input has a degraded behaviour (out-of-range cells are dropped, stale lights
//! freeze then disappear, zeroed lights and disabled bloom are no-ops).
//!
//! All scratch buffers are owned by the [`Pipeline`] and reused, so
//! [`Pipeline::render_into`] does not allocate once warmed up.

use crate::bloom::BloomProcessor;
use crate::compositor::Compositor;
use crate::context::RenderContext;
use crate::error::ConfigError;
use crate::grid::{FrameBuffer, Viewport};
use crate::layer::LayerRegistry;
use crate::light::{Light, LightRegistry};
use crate::lighting::LightingEngine;
use crate::types::LightId;

/// Collaborator-owned inputs: the windows and the lights.
#[derive(Debug, Default)]
pub struct Scene {
    pub layers: LayerRegistry,
    pub lights: LightRegistry,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a light, validating its follow target against this scene's layers.
    pub fn add_light(&mut self, light: Light) -> Result<LightId, ConfigError> {
        self.lights.add_light(light, &self.layers)
    }
}

/// Counters from the last rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub layers: usize,
    pub cells_written: usize,
    pub lit_cells: usize,
    pub bloom_sources: usize,
    pub lights_dropped: usize,
}

#[derive(Debug, Default)]
pub struct Pipeline {
    compositor: Compositor,
    lighting: LightingEngine,
    bloom: BloomProcessor,
    stats: FrameStats,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and it is only resized when the viewport changes.
    pub fn render_into(
        &mut self,
        scene: &mut Scene,
        ctx: &RenderContext,
        viewport: Viewport,
        frame: &mut FrameBuffer,
    ) {
        if frame.width() != viewport.width || frame.height() != viewport.height {
            frame.resize(viewport.width, viewport.height);
        }

        let lights_dropped = scene
            .lights
            .resolve_positions(&scene.layers, ctx.lighting.stale_frame_limit);

        let cells_written = self
            .compositor
            .composite(&mut scene.layers, &ctx.camera, frame);

        let lit_cells = if ctx.lighting.enabled && !scene.lights.is_empty() {
            self.lighting.prepare(&scene.layers);
            self.compositor.apply_illumination(
                frame,
                &self.lighting,
                &scene.lights,
                ctx.lighting.ambient.to_unit(),
            )
        } else {
            0
        };

        let bloom_sources = self.bloom.apply(&ctx.bloom, frame);

        self.stats = FrameStats {
            layers: scene.layers.len(),
            cells_written,
            lit_cells,
            bloom_sources,
            lights_dropped,
        };
        log::trace!("frame: {:?}", self.stats);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &mut self,
        scene: &mut Scene,
        ctx: &RenderContext,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut frame = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(scene, ctx, viewport, &mut frame);
        frame
    }

    pub fn last_stats(&self) -> FrameStats {
        self.stats
    }
}
