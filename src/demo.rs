//! Demo scene: a parallax night landscape with a torch-carrying player.
//!
//! Three world layers at depths 2, 1 and 0 scroll at different rates in
//! perspective mode. Pillars block light, lamps on top of them glow, and a HUD
//! layer stays fixed to the screen.

use std::fmt::Write as _;

use cellglow_core::{
    BorderStyle, BoxStyle, CameraMode, ConfigError, FrameBuffer, FrameStats, LayerSpec, Light,
    LightId, Pipeline, RenderContext, Scene, Viewport,
};
use cellglow_types::{Cell, Rgb};

use crate::controls::Command;

pub const SKY: &str = "sky";
pub const HILLS: &str = "hills";
pub const GROUND: &str = "ground";
pub const PLAYER: &str = "player";
pub const HUD: &str = "hud";

pub const WORLD_WIDTH: u16 = 240;
pub const WORLD_HEIGHT: u16 = 24;
const HUD_WIDTH: u16 = 120;
const HUD_HEIGHT: u16 = 3;

const HUD_STYLE: BoxStyle = BoxStyle {
    border: BorderStyle::ROUNDED,
    border_fg: Rgb::new(110, 110, 140),
    title_fg: Rgb::new(255, 255, 100),
    bg: Some(Rgb::new(10, 10, 20)),
    fill: true,
};

const FLOOR_Y: i32 = 19;
const PILLAR_SPACING: i32 = 30;
const PILLAR_TOP: i32 = 12;

const TORCH: Rgb = Rgb::new(255, 180, 90);
const LAMP: Rgb = Rgb::new(120, 160, 255);

/// Build the demo scene.
pub fn build_scene() -> Result<Scene, ConfigError> {
    let mut scene = Scene::new();

    let sky = scene
        .layers
        .add_layer(LayerSpec::new(SKY, WORLD_WIDTH, WORLD_HEIGHT).depth(2.0).z_index(0))?;
    paint_sky(sky.grid_mut());

    let hills = scene
        .layers
        .add_layer(LayerSpec::new(HILLS, WORLD_WIDTH, WORLD_HEIGHT).depth(1.0).z_index(1))?;
    paint_hills(hills.grid_mut());

    let ground = scene
        .layers
        .add_layer(LayerSpec::new(GROUND, WORLD_WIDTH, WORLD_HEIGHT).z_index(2))?;
    paint_ground(ground.grid_mut());

    let player = scene
        .layers
        .add_layer(LayerSpec::new(PLAYER, 1, 1).origin(20, FLOOR_Y - 1).z_index(3))?;
    player.grid_mut().put(0, 0, '@', Rgb::new(240, 240, 240));

    scene.layers.add_layer(
        LayerSpec::new(HUD, HUD_WIDTH, HUD_HEIGHT)
            .fixed(true)
            .z_index(100),
    )?;

    scene.add_light(
        Light::new(0.0, 0.0)
            .following(PLAYER, 0.0, -1.0)
            .with_radius(12.0)
            .with_color(TORCH)
            .with_intensity(1.2)
            .with_falloff(1.5),
    )?;

    for x in (PILLAR_SPACING..WORLD_WIDTH as i32).step_by(PILLAR_SPACING as usize) {
        scene.add_light(
            Light::new(x as f32, (PILLAR_TOP - 1) as f32)
                .with_radius(8.0)
                .with_color(LAMP)
                .with_intensity(0.8),
        )?;
    }

    Ok(scene)
}

fn paint_sky(grid: &mut FrameBuffer) {
    for y in 0..10 {
        for x in 0..WORLD_WIDTH as i32 {
            let h = (x * 7919 + y * 104_729) % 53;
            if h == 0 {
                grid.set(x, y, Cell::glyph('*', Rgb::new(250, 250, 255)).emissive());
            } else if h < 3 {
                grid.put(x, y, '.', Rgb::new(140, 140, 170));
            }
        }
    }
    grid.set(60, 2, Cell::glyph('O', Rgb::new(255, 250, 220)).emissive());
}

fn paint_hills(grid: &mut FrameBuffer) {
    let bg = Rgb::new(20, 45, 25);
    for x in 0..WORLD_WIDTH as i32 {
        let peak = 11 + ((x / 5) % 4 - 2).abs();
        for y in peak..FLOOR_Y {
            let cell = if y == peak {
                Cell::glyph('^', Rgb::new(70, 130, 80)).with_bg(bg)
            } else {
                Cell::fill(bg)
            };
            grid.set(x, y, cell);
        }
    }
}

fn paint_ground(grid: &mut FrameBuffer) {
    let w = WORLD_WIDTH;
    let floor = Cell::glyph('=', Rgb::new(150, 110, 70)).with_bg(Rgb::new(50, 35, 20));
    grid.fill_rect(0, FLOOR_Y, w, WORLD_HEIGHT - FLOOR_Y as u16, floor);

    let pillar = Cell::glyph('#', Rgb::new(170, 170, 170)).blocking();
    for x in (PILLAR_SPACING..w as i32).step_by(PILLAR_SPACING as usize) {
        grid.fill_rect(x, PILLAR_TOP, 1, (FLOOR_Y - PILLAR_TOP) as u16, pillar);
        grid.set(x, PILLAR_TOP - 1, Cell::glyph('*', LAMP).emissive());
    }
}

/// Scene, settings and render state for the interactive demo.
pub struct Demo {
    pub scene: Scene,
    pub ctx: RenderContext,
    torch: Option<LightId>,
    pipeline: Pipeline,
    frame: FrameBuffer,
    hud: String,
}

impl Demo {
    pub fn new(ctx: RenderContext) -> Result<Self, ConfigError> {
        ctx.validate()?;
        let scene = build_scene()?;
        let torch = scene.lights.iter().next().map(|(id, _)| id);
        Ok(Self {
            scene,
            ctx,
            torch,
            pipeline: Pipeline::new(),
            frame: FrameBuffer::new(0, 0),
            hud: String::with_capacity(HUD_WIDTH as usize),
        })
    }

    /// Apply a command. Returns `false` when the demo should exit.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Pan(dx, dy) => self.ctx.camera.move_by(dx as f32, dy as f32),
            Command::MovePlayer(dx, dy) => {
                if let Some(player) = self.scene.layers.layer_mut(PLAYER) {
                    player.move_by(dx, dy);
                }
            }
            Command::ToggleCameraMode => {
                let mode = self.ctx.camera.mode().toggled();
                self.ctx.camera.set_mode(mode);
            }
            Command::ToggleBloom => self.ctx.bloom.enabled = !self.ctx.bloom.enabled,
            Command::ToggleLighting => self.ctx.lighting.enabled = !self.ctx.lighting.enabled,
            Command::Quit => return false,
        }
        true
    }

    pub fn torch(&self) -> Option<LightId> {
        self.torch
    }

    /// Refresh the HUD and render a frame.
    pub fn render(&mut self, viewport: Viewport) -> &FrameBuffer {
        self.write_hud(viewport.width);
        self.pipeline
            .render_into(&mut self.scene, &self.ctx, viewport, &mut self.frame);
        &self.frame
    }

    pub fn stats(&self) -> FrameStats {
        self.pipeline.last_stats()
    }

    /// Redraw the HUD panel, sized to fit the viewport width.
    fn write_hud(&mut self, viewport_width: u16) {
        let stats = self.pipeline.last_stats();
        let (cx, cy) = self.ctx.camera.position();
        let on_off = |on: bool| if on { "on" } else { "off" };
        let mode = match self.ctx.camera.mode() {
            CameraMode::Orthographic => "ortho",
            CameraMode::Perspective => "persp",
        };

        self.hud.clear();
        let _ = write!(
            self.hud,
            " [p] {mode}  [b] bloom {}  [l] light {}  cam {cx:.0},{cy:.0}  lit {}  glow {}  [q] quit",
            on_off(self.ctx.bloom.enabled),
            on_off(self.ctx.lighting.enabled),
            stats.lit_cells,
            stats.bloom_sources,
        );

        if let Some(hud) = self.scene.layers.layer_mut(HUD) {
            let width = viewport_width.min(HUD_WIDTH);
            let grid = hud.grid_mut();
            grid.clear();
            grid.draw_panel(0, 0, width, HUD_HEIGHT, "cellglow", &HUD_STYLE);
            let text = Cell::glyph(' ', Rgb::new(220, 220, 120)).with_bg(Rgb::new(10, 10, 20));
            let room = width.saturating_sub(4) as usize;
            for (i, ch) in self.hud.chars().take(room).enumerate() {
                grid.set(2 + i as i32, 1, Cell { glyph: Some(ch), ..text });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_builds() {
        let scene = build_scene().unwrap();
        assert_eq!(scene.layers.len(), 5);
        assert!(scene.lights.len() > 1);
        assert!(scene.layers.layer(HUD).unwrap().is_fixed());
        assert!(!scene.layers.layer(HUD).unwrap().is_lit());
    }

    #[test]
    fn torch_follows_player() {
        let mut demo = Demo::new(RenderContext::default()).unwrap();
        demo.render(Viewport::new(80, 24));
        demo.apply(Command::MovePlayer(5, 0));
        demo.render(Viewport::new(80, 24));
        let torch = demo.torch().unwrap();
        let (x, y) = demo.scene.lights.light(torch).unwrap().position();
        assert_eq!((x, y), (25.0, (FLOOR_Y - 2) as f32));
    }

    #[test]
    fn hud_is_a_titled_panel_clipped_to_the_viewport() {
        let mut demo = Demo::new(RenderContext::default()).unwrap();
        let frame = demo.render(Viewport::new(40, 12)).clone();
        let top: String = frame.row(0).iter().map(|c| c.glyph.unwrap_or(' ')).collect();
        assert!(top.starts_with('╭'));
        assert!(top.contains("cellglow"));
        assert_eq!(frame.get(39, 0).unwrap().glyph, Some('╮'));
        assert_eq!(frame.get(0, 2).unwrap().glyph, Some('╰'));
        // Status text stays inside the border.
        assert_eq!(frame.get(2, 1).unwrap().glyph, Some(' '));
        assert_eq!(frame.get(3, 1).unwrap().glyph, Some('['));
        assert_eq!(frame.get(39, 1).unwrap().glyph, Some('│'));
    }

    #[test]
    fn quit_stops_the_demo() {
        let mut demo = Demo::new(RenderContext::default()).unwrap();
        assert!(demo.apply(Command::ToggleBloom));
        assert!(demo.ctx.bloom.enabled);
        assert!(!demo.apply(Command::Quit));
    }
}
