//! Bloom post-process through the full pipeline.

use cellglow::core::{
    BloomConfig, Cell, FrameBuffer, LayerSpec, Pipeline, RenderContext, Rgb, Scene, Viewport,
};

const DIM: Rgb = Rgb::new(20, 20, 20);

/// `.` at x = 1 and 5, a bright `*` at x = 3, nothing else.
fn strip(star: Cell) -> Scene {
    let mut scene = Scene::new();
    let layer = scene
        .layers
        .add_layer(LayerSpec::new("strip", 7, 1))
        .unwrap();
    let grid = layer.grid_mut();
    grid.put(1, 0, '.', DIM);
    grid.set(3, 0, star);
    grid.put(5, 0, '.', DIM);
    scene
}

fn bloom_ctx(bloom: BloomConfig) -> RenderContext {
    RenderContext {
        bloom,
        ..RenderContext::default()
    }
}

fn render(scene: &mut Scene, ctx: &RenderContext) -> (FrameBuffer, usize) {
    let mut pipeline = Pipeline::new();
    let frame = pipeline.render(scene, ctx, Viewport::new(7, 1));
    (frame, pipeline.last_stats().bloom_sources)
}

#[test]
fn bright_cells_glow_onto_neighbours() {
    let mut scene = strip(Cell::glyph('*', Rgb::WHITE));
    let ctx = bloom_ctx(BloomConfig::new(true, 200, 1, 1.0).unwrap());
    let (frame, sources) = render(&mut scene, &ctx);

    assert_eq!(sources, 1);
    // Glyph cells brighten in the foreground.
    assert!(frame.get(1, 0).unwrap().fg.r > DIM.r);
    assert!(frame.get(5, 0).unwrap().fg.r > DIM.r);
    assert_eq!(frame.get(1, 0).unwrap().fg, frame.get(5, 0).unwrap().fg);
    // Empty cells next to the source pick up a background tint.
    let halo = frame.get(2, 0).unwrap();
    assert!(halo.glyph.is_none());
    assert!(halo.bg.is_some_and(|bg| bg.r > 0));
    // Beyond the kernel nothing changes.
    assert!(frame.get(0, 0).unwrap().is_empty());
}

#[test]
fn disabled_or_subthreshold_bloom_changes_nothing() {
    let mut scene = strip(Cell::glyph('*', Rgb::WHITE));
    let (plain, _) = render(&mut scene, &RenderContext::default());

    let (frame, sources) = render(&mut scene, &bloom_ctx(BloomConfig::default()));
    assert_eq!(sources, 0);
    assert_eq!(frame, plain);

    let mut dim_scene = strip(Cell::glyph('*', Rgb::new(150, 150, 150)));
    let (dim_plain, _) = render(&mut dim_scene, &RenderContext::default());
    let ctx = bloom_ctx(BloomConfig::new(true, 200, 1, 1.0).unwrap());
    let (frame, sources) = render(&mut dim_scene, &ctx);
    assert_eq!(sources, 0);
    assert_eq!(frame, dim_plain);
}

#[test]
fn emissive_cells_bloom_below_threshold() {
    let mut scene = strip(Cell::glyph('*', Rgb::new(150, 150, 150)).emissive());
    let ctx = bloom_ctx(BloomConfig::new(true, 200, 1, 1.0).unwrap());
    let (frame, sources) = render(&mut scene, &ctx);

    assert_eq!(sources, 1);
    assert!(frame.get(2, 0).unwrap().bg.is_some());
}

#[test]
fn larger_intensity_glows_brighter() {
    let glow_at = |intensity: f32| {
        let mut scene = strip(Cell::glyph('*', Rgb::WHITE));
        let ctx = bloom_ctx(BloomConfig::new(true, 200, 1, intensity).unwrap());
        let (frame, _) = render(&mut scene, &ctx);
        frame.get(1, 0).unwrap().fg.r
    };
    assert!(glow_at(4.0) > glow_at(1.0));
}

#[test]
fn invalid_bloom_parameters_are_rejected() {
    assert!(BloomConfig::new(true, 200, 0, 1.0).is_err());
    assert!(BloomConfig::new(true, 200, 2, -1.0).is_err());
    assert!(BloomConfig::new(true, 200, 2, f32::NAN).is_err());
}
