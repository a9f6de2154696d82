//! The engine's step loop
//!
//! Runs on the worker thread: advance the ball, then lock, draw and post a
//! frame. Posting blocks until the display takes the frame, which is the only
//! pacing the loop has.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use crate::arena::Arena;
use crate::error::{EngineError, SurfaceError};
use crate::sim::{BouncingBall, Location};
use crate::surface::Surface;

/// Per-run running flag shared between the controller and the worker
#[derive(Debug, Clone)]
pub(crate) struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[inline]
    pub(crate) fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn cancel(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counts a worker as alive from spawn request until the thread unwinds
pub(crate) struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    pub(crate) fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// What a single start/stop run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames accepted by the presentation consumer
    pub frames: u64,
    /// Frames dropped because an interrupt arrived while still running
    pub dropped: u64,
    /// Whether this run had to create the ball
    pub created_ball: bool,
}

pub(crate) fn run<S, A>(
    surface: &S,
    arena: &A,
    bounds: Location,
    token: &CancelToken,
    frames_total: &AtomicU64,
) -> Result<RunSummary, EngineError>
where
    S: Surface + ?Sized,
    A: Arena + ?Sized,
{
    let created_ball = arena
        .ball_slot()
        .get_or_insert_with(|| BouncingBall::centered(bounds));
    if created_ball {
        log::debug!("Created ball in {}x{} arena", bounds.x, bounds.y);
    }

    let mut summary = RunSummary {
        created_ball,
        ..Default::default()
    };

    while token.is_running() {
        arena.ball_slot().advance();

        match render(surface, arena) {
            Ok(()) => {
                summary.frames += 1;
                frames_total.fetch_add(1, Ordering::Relaxed);
            }
            // Either stop() is tearing us down, and the loop check ends the
            // run, or a leftover signal from an earlier stop cost us a frame.
            Err(SurfaceError::Interrupted) => {
                if token.is_running() {
                    log::warn!("Stale surface interrupt, frame dropped");
                    summary.dropped += 1;
                }
            }
            Err(err) => {
                log::error!("Render handshake failed, engine loop aborted: {err}");
                return Err(err.into());
            }
        }
    }

    Ok(summary)
}

/// Lock a frame, let the arena draw it, post it back
fn render<S, A>(surface: &S, arena: &A) -> Result<(), SurfaceError>
where
    S: Surface + ?Sized,
    A: Arena + ?Sized,
{
    let mut frame = surface.lock_frame()?;
    arena.draw(&mut frame);
    surface.post_frame(frame)
}
