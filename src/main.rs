//! Interactive cellglow demo (default binary).
//!
//! Arrows pan the camera, WASD moves the torch bearer, `p` toggles parallax,
//! `b` toggles bloom, `l` toggles lighting, `q` or Ctrl-C quits.
//!
//! Settings are read from `CELLGLOW_*` environment variables; see
//! `RenderContext::from_env`. Set `CELLGLOW_LOG_FILE` to capture logs.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use cellglow::controls::map_key;
use cellglow::core::{RenderContext, Viewport};
use cellglow::demo::Demo;
use cellglow::logging::{init_logging, LoggingConfig};
use cellglow::term::TerminalRenderer;

const FRAME_MS: u64 = 33;

fn main() -> Result<()> {
    init_logging(LoggingConfig::for_terminal());

    let ctx = RenderContext::from_env();
    log::info!(
        "starting: camera={} bloom={} lighting={}",
        ctx.camera.mode().as_str(),
        ctx.bloom.enabled,
        ctx.lighting.enabled
    );
    let mut demo = Demo::new(ctx)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut demo);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, demo: &mut Demo) -> Result<()> {
    let frame_time = Duration::from_millis(FRAME_MS);

    loop {
        let started = Instant::now();

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        term.draw(demo.render(Viewport::new(w, h)))?;

        let timeout = frame_time.saturating_sub(started.elapsed());
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(command) = map_key(key) {
                    if !demo.apply(command) {
                        log::info!("quit");
                        return Ok(());
                    }
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}
