//! Rendering core - pure, deterministic, and testable
//!
//! This crate turns a set of layered character grids, a camera and a list of
//! point lights into one final frame. It has **zero dependencies** on terminals
//! or other I/O, making it:
//!
//! - **Deterministic**: identical inputs produce identical frames
//! - **Testable**: every stage is a plain function over owned buffers
//! - **Panic-free on bad coordinates**: out-of-range writes are ignored
//! - **Fast**: zero-allocation hot path once scratch buffers are warm
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size cell buffers (layers and the frame)
//! - [`layer`]: named layers and their z-ordered registry
//! - [`camera`]: per-layer parallax offsets
//! - [`light`]: point lights, follow targets and stale handling
//! - [`lighting`]: falloff, shadow rays, illumination
//! - [`compositor`]: layer merge into the frame
//! - [`bloom`]: glow post-process
//! - [`context`]: per-frame configuration
//! - [`pipeline`]: the per-frame entry point
//! - [`ui`]: borders and titled panels for HUD grids
//!
//! # Example
//!
//! ```
//! use cellglow_core::{
//!     Cell, LayerSpec, Light, Pipeline, RenderContext, Rgb, Scene, Viewport,
//! };
//!
//! let mut scene = Scene::new();
//! let floor = scene.layers.add_layer(LayerSpec::new("floor", 20, 5)).unwrap();
//! floor.grid_mut().fill_rect(0, 0, 20, 5, Cell::glyph('.', Rgb::new(200, 200, 200)));
//! scene.add_light(Light::new(10.0, 2.0).with_radius(6.0)).unwrap();
//!
//! let mut pipeline = Pipeline::new();
//! let frame = pipeline.render(&mut scene, &RenderContext::default(), Viewport::new(20, 5));
//!
//! // Cells near the light are brighter than cells at the edge.
//! let near = frame.get(10, 2).unwrap().fg.r;
//! let far = frame.get(0, 0).unwrap().fg.r;
//! assert!(near > far);
//! ```

pub mod bloom;
pub mod camera;
pub mod compositor;
pub mod context;
pub mod error;
pub mod grid;
pub mod layer;
pub mod light;
pub mod lighting;
pub mod pipeline;
pub mod ui;

pub use cellglow_types as types;

// Re-export commonly used types for convenience
pub use bloom::{bloom_source, luminance, BloomConfig, BloomProcessor};
pub use camera::{Camera, CameraMode, Offset};
pub use compositor::Compositor;
pub use context::RenderContext;
pub use error::ConfigError;
pub use grid::{FrameBuffer, GridBuffer, Viewport};
pub use layer::{Layer, LayerRegistry, LayerSpec};
pub use light::{FollowTarget, Light, LightRegistry};
pub use lighting::{falloff, line_of_sight, shade, LightingConfig, LightingEngine, OccluderMap};
pub use pipeline::{FrameStats, Pipeline, Scene};
pub use types::{Cell, LayerId, LightId, Rgb};
pub use ui::{BorderStyle, BoxStyle};
