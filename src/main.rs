//! Bouncing Ball entry point
//!
//! Runs the engine against an emulated display for a few start/stop cycles,
//! the way a view would as its surface is created and destroyed.
//!
//! Usage: `bouncing-ball [settings.json]`

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bouncing_ball::surface::{DisplayThread, vsync_pair};
use bouncing_ball::{Arena, CanvasArena, Engine, Settings};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bouncing Ball starting...");

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    match run(settings_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default(settings_path.as_deref())?;

    let (surface, consumer) = vsync_pair(settings.width, settings.height, settings.frame_pool);
    let surface = Arc::new(surface);
    let mut display = DisplayThread::spawn(consumer, settings.refresh_hz)?;
    let arena = Arc::new(
        CanvasArena::new(settings.width as f32, settings.height as f32)
            .with_background(settings.background),
    );
    let engine = Engine::new();

    for cycle in 1..=settings.cycles {
        engine.start(Arc::clone(&surface), Arc::clone(&arena))?;
        thread::sleep(Duration::from_millis(settings.run_millis));

        if let Some(summary) = engine.stop()? {
            log::info!(
                "Run {cycle}/{}: {} frames, {} dropped",
                settings.cycles,
                summary.frames,
                summary.dropped
            );
        }
        if let Some(ball) = arena.ball_slot().snapshot() {
            log::info!(
                "Ball at ({:.1}, {:.1}) moving ({}, {})",
                ball.position.x,
                ball.position.y,
                ball.velocity.dx,
                ball.velocity.dy
            );
        }

        if cycle < settings.cycles {
            thread::sleep(Duration::from_millis(settings.pause_millis));
        }
    }

    log::info!(
        "{} frames rendered, {} presented",
        engine.frames_presented(),
        display.presented()
    );

    if let Some(path) = &settings.snapshot_path {
        match display.last_frame() {
            Some(frame) => {
                frame.write_ppm(BufWriter::new(File::create(path)?))?;
                log::info!("Snapshot #{} written to {}", frame.sequence(), path.display());
            }
            None => log::warn!("No frame was presented, snapshot skipped"),
        }
    }

    display.stop();
    Ok(())
}
