//! Windows/layers and the registry that orders them for compositing.
//!
//! Responsibilities:
//! - own each layer's grid
//! - validate layer configuration up front
//! - provide deterministic paint order (z-index, then insertion order)

use crate::error::{non_negative, ConfigError};
use crate::grid::GridBuffer;
use crate::types::LayerId;

/// Ordering key: z-index first, insertion order breaks ties.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct SortKey {
    z: i32,
    order: u32,
}

/// Configuration for a new layer.
#[derive(Debug, Clone)]
pub struct LayerSpec {
    id: LayerId,
    width: u16,
    height: u16,
    origin: (i32, i32),
    z_index: i32,
    depth: f32,
    fixed: bool,
    visible: bool,
    lit: Option<bool>,
}

impl LayerSpec {
    pub fn new(id: impl Into<LayerId>, width: u16, height: u16) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            origin: (0, 0),
            z_index: 0,
            depth: 0.0,
            fixed: false,
            visible: true,
            lit: None,
        }
    }

    /// Position in world cells.
    pub fn origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn z_index(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    /// Parallax depth. Ignored for fixed layers.
    pub fn depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Fixed layers ignore the camera (HUD/UI).
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Whether lights affect this layer. Defaults to `!fixed`.
    pub fn lit(mut self, lit: bool) -> Self {
        self.lit = Some(lit);
        self
    }
}

/// A named, independently positioned grid of cells.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    origin: (i32, i32),
    key: SortKey,
    depth: f32,
    fixed: bool,
    visible: bool,
    lit: bool,
    grid: GridBuffer,
}

impl Layer {
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.origin = (x, y);
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.origin = (
            self.origin.0.saturating_add(dx),
            self.origin.1.saturating_add(dy),
        );
    }

    pub fn z_index(&self) -> i32 {
        self.key.z
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: f32) -> Result<(), ConfigError> {
        self.depth = non_negative("depth", depth)?;
        Ok(())
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn set_lit(&mut self, lit: bool) {
        self.lit = lit;
    }

    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    pub fn grid(&self) -> &GridBuffer {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridBuffer {
        &mut self.grid
    }

    /// World position of a cell of this layer, or `None` if it falls outside
    /// the `i32` coordinate range.
    #[inline]
    pub fn world_position(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        Some((self.origin.0.checked_add(x)?, self.origin.1.checked_add(y)?))
    }
}

/// Registry of layers.
///
/// Paint-order iteration reuses an internal index buffer; no per-frame
/// allocation once warmed.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
    next_order: u32,
    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Create a layer from `spec`.
    pub fn add_layer(&mut self, spec: LayerSpec) -> Result<&mut Layer, ConfigError> {
        if spec.width == 0 || spec.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: spec.width,
                height: spec.height,
            });
        }
        let depth = non_negative("depth", spec.depth)?;
        if self.position(spec.id.as_str()).is_some() {
            return Err(ConfigError::DuplicateLayer(spec.id));
        }

        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        log::debug!(
            "add layer `{}` {}x{} z={} depth={} fixed={}",
            spec.id,
            spec.width,
            spec.height,
            spec.z_index,
            depth,
            spec.fixed
        );

        self.layers.push(Layer {
            id: spec.id,
            origin: spec.origin,
            key: SortKey {
                z: spec.z_index,
                order,
            },
            depth,
            fixed: spec.fixed,
            visible: spec.visible,
            lit: spec.lit.unwrap_or(!spec.fixed),
            grid: GridBuffer::new(spec.width, spec.height),
        });
        self.sorted_dirty = true;

        let last = self.layers.len() - 1;
        Ok(&mut self.layers[last])
    }

    /// Returns true if the layer existed.
    pub fn remove_layer(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) => {
                self.layers.remove(i);
                self.sorted_dirty = true;
                log::debug!("remove layer `{id}`");
                true
            }
            None => false,
        }
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.position(id).map(|i| &self.layers[i])
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.position(id).map(move |i| &mut self.layers[i])
    }

    /// Change a layer's z-index. Its insertion order still breaks ties.
    pub fn set_z_index(&mut self, id: &str, z: i32) -> Result<(), ConfigError> {
        let i = self
            .position(id)
            .ok_or_else(|| ConfigError::UnknownLayer(LayerId::from(id)))?;
        self.layers[i].key.z = z;
        self.sorted_dirty = true;
        Ok(())
    }

    pub fn set_depth(&mut self, id: &str, depth: f32) -> Result<(), ConfigError> {
        self.layer_mut(id)
            .ok_or_else(|| ConfigError::UnknownLayer(LayerId::from(id)))?
            .set_depth(depth)
    }

    /// Layers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Layers back-to-front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &Layer> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.layers[i])
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id.as_str() == id)
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.layers.len());

        // Keys are unique (insertion order is part of the key), so an unstable
        // sort still yields a deterministic order.
        let layers = &self.layers;
        self.sorted_indices.sort_unstable_by_key(|&i| layers[i].key);

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(reg: &mut LayerRegistry) -> Vec<String> {
        reg.iter_in_paint_order()
            .map(|l| l.id().as_str().to_string())
            .collect()
    }

    #[test]
    fn paint_order_is_z_then_insertion() {
        let mut reg = LayerRegistry::new();
        reg.add_layer(LayerSpec::new("top", 1, 1).z_index(5)).unwrap();
        reg.add_layer(LayerSpec::new("a", 1, 1).z_index(1)).unwrap();
        reg.add_layer(LayerSpec::new("b", 1, 1).z_index(1)).unwrap();
        assert_eq!(ids(&mut reg), vec!["a", "b", "top"]);

        reg.set_z_index("top", 0).unwrap();
        assert_eq!(ids(&mut reg), vec!["top", "a", "b"]);
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut reg = LayerRegistry::new();
        assert!(matches!(
            reg.add_layer(LayerSpec::new("z", 0, 4)),
            Err(ConfigError::InvalidSize { .. })
        ));
        assert!(matches!(
            reg.add_layer(LayerSpec::new("d", 4, 4).depth(-1.0)),
            Err(ConfigError::InvalidParameter { name: "depth", .. })
        ));
        reg.add_layer(LayerSpec::new("x", 4, 4)).unwrap();
        assert_eq!(
            reg.add_layer(LayerSpec::new("x", 2, 2)).unwrap_err(),
            ConfigError::DuplicateLayer(LayerId::from("x"))
        );
        assert_eq!(
            reg.set_z_index("missing", 1).unwrap_err(),
            ConfigError::UnknownLayer(LayerId::from("missing"))
        );
    }

    #[test]
    fn fixed_layers_are_unlit_by_default() {
        let mut reg = LayerRegistry::new();
        assert!(!reg.add_layer(LayerSpec::new("hud", 1, 1).fixed(true)).unwrap().is_lit());
        assert!(reg.add_layer(LayerSpec::new("world", 1, 1)).unwrap().is_lit());
        assert!(reg
            .add_layer(LayerSpec::new("sign", 1, 1).fixed(true).lit(true))
            .unwrap()
            .is_lit());
    }

    #[test]
    fn remove_layer_updates_order() {
        let mut reg = LayerRegistry::new();
        reg.add_layer(LayerSpec::new("a", 1, 1)).unwrap();
        reg.add_layer(LayerSpec::new("b", 1, 1)).unwrap();
        assert!(reg.remove_layer("a"));
        assert!(!reg.remove_layer("a"));
        assert_eq!(ids(&mut reg), vec!["b"]);
    }

    #[test]
    fn world_position_rejects_overflow() {
        let mut reg = LayerRegistry::new();
        let layer = reg
            .add_layer(LayerSpec::new("edge", 4, 1).origin(i32::MAX - 1, -3))
            .unwrap();
        assert_eq!(layer.world_position(1, 2), Some((i32::MAX, -1)));
        assert_eq!(layer.world_position(2, 0), None);
    }
}
