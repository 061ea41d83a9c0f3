//! Layer compositor: merges layers back-to-front into the frame buffer.
//!
//! Later layers overwrite earlier ones cell by cell; empty source cells are
//! transparent. The compositor also remembers, for every destination cell, the
//! world position of the lit cell that won it, so lighting only has to be
//! evaluated where something lit actually landed.

use crate::camera::Camera;
use crate::grid::FrameBuffer;
use crate::layer::LayerRegistry;
use crate::light::LightRegistry;
use crate::lighting::{shade, LightingEngine};

#[derive(Debug, Default)]
pub struct Compositor {
    /// World position of the lit source cell that landed at each frame index.
    lit_sources: Vec<Option<(i32, i32)>>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear `frame` and draw every visible layer into it.
    ///
    /// Returns the number of cell writes.
    pub fn composite(
        &mut self,
        layers: &mut LayerRegistry,
        camera: &Camera,
        frame: &mut FrameBuffer,
    ) -> usize {
        frame.clear();
        self.lit_sources.clear();
        self.lit_sources.resize(frame.cells().len(), None);

        let mut written = 0;
        for layer in layers.iter_in_paint_order() {
            if !layer.is_visible() {
                continue;
            }
            let (off_x, off_y) = camera.layer_offset(layer).rounded();
            let (ox, oy) = layer.origin();
            let base_x = ox.saturating_sub(off_x);
            let base_y = oy.saturating_sub(off_y);

            for (x, y, cell) in layer.grid().iter_filled() {
                let Some(i) = frame.idx(base_x.saturating_add(x), base_y.saturating_add(y)) else {
                    continue;
                };
                frame.cells_mut()[i] = cell;
                self.lit_sources[i] = if layer.is_lit() {
                    layer.world_position(x, y)
                } else {
                    None
                };
                written += 1;
            }
        }
        written
    }

    /// Scale the colors of lit cells by ambient plus light.
    ///
    /// Returns the number of cells lit.
    pub fn apply_illumination(
        &self,
        frame: &mut FrameBuffer,
        engine: &LightingEngine,
        lights: &LightRegistry,
        ambient: [f32; 3],
    ) -> usize {
        let mut lit = 0;
        let cells = frame.cells_mut();
        for (cell, source) in cells.iter_mut().zip(&self.lit_sources) {
            let Some((wx, wy)) = *source else {
                continue;
            };
            let illumination = engine.illumination_at(lights, wx, wy);
            cell.fg = shade(cell.fg, ambient, illumination);
            cell.bg = cell.bg.map(|bg| shade(bg, ambient, illumination));
            lit += 1;
        }
        lit
    }
}
