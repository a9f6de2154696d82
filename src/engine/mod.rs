//! Engine lifecycle
//!
//! ```text
//!              start(surface, arena)
//!   ┌─────────┐ ─────────────────────> ┌──────────────────┐
//!   │ Stopped │                        │ Running(worker)  │
//!   └─────────┘ <───────────────────── └──────────────────┘
//!                stop(): clear flag, interrupt surface, join
//! ```
//!
//! Exactly one worker thread exists while running. `stop()` holds the state
//! lock across the join, so a concurrent `start()` waits for the old worker
//! to be gone before spawning a new one.

mod worker;

pub use worker::RunSummary;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::arena::Arena;
use crate::error::{EngineError, EngineResult};
use crate::sim::Location;
use crate::surface::Surface;
use worker::{CancelToken, LiveGuard};

/// Name given to the worker thread
pub const WORKER_THREAD_NAME: &str = "engine";

/// A running worker and what `stop()` needs to shut it down
struct Worker {
    handle: JoinHandle<EngineResult<RunSummary>>,
    token: CancelToken,
    surface: Arc<dyn Surface>,
}

enum EngineState {
    Stopped,
    Running(Worker),
}

/// Drives the bouncing ball simulation on a background thread.
///
/// The controller thread calls [`start`](Engine::start) and
/// [`stop`](Engine::stop); [`is_started`](Engine::is_started) may be read
/// from anywhere.
pub struct Engine {
    state: Mutex<EngineState>,
    /// Lock-free mirror of `state` for readers
    started: AtomicBool,
    frames: Arc<AtomicU64>,
    live_workers: Arc<AtomicUsize>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState::Stopped),
            started: AtomicBool::new(false),
            frames: Arc::new(AtomicU64::new(0)),
            live_workers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Whether a worker is currently attached to this engine
    #[inline]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Start the simulation loop. Does nothing if already started.
    ///
    /// The arena's current size becomes the ball's bounds for this run; if the
    /// arena already holds a ball it is reused untouched.
    ///
    /// # Errors
    ///
    /// [`EngineError::Spawn`] if the worker thread cannot be created. The
    /// engine stays stopped in that case.
    pub fn start<S, A>(&self, surface: Arc<S>, arena: Arc<A>) -> EngineResult<()>
    where
        S: Surface + 'static,
        A: Arena + 'static,
    {
        let mut state = self.state.lock();
        if matches!(*state, EngineState::Running(_)) {
            return Ok(());
        }

        // No worker exists yet, so nothing can race the drain
        surface.reset();

        let bounds = Location::new(arena.width(), arena.height());
        let token = CancelToken::new();
        let guard = LiveGuard::enter(&self.live_workers);

        let worker_surface = Arc::clone(&surface);
        let worker_token = token.clone();
        let frames = Arc::clone(&self.frames);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || {
                let _alive = guard;
                worker::run(&*worker_surface, &*arena, bounds, &worker_token, &frames)
            })?;

        *state = EngineState::Running(Worker {
            handle,
            token,
            surface,
        });
        self.started.store(true, Ordering::Release);

        log::info!("Engine started ({}x{} arena)", bounds.x, bounds.y);
        Ok(())
    }

    /// Stop the simulation loop and wait for the worker to exit. Does nothing
    /// if not started.
    ///
    /// Returns the summary of the run that was stopped, or `None` if there
    /// was nothing to stop. Once this returns, no worker is alive and no more
    /// frames will be rendered.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Surface`] if the run had already died on a failed
    ///   render handshake
    /// - [`EngineError::WorkerPanicked`] if the worker panicked
    pub fn stop(&self) -> EngineResult<Option<RunSummary>> {
        let mut state = self.state.lock();
        let worker = match std::mem::replace(&mut *state, EngineState::Stopped) {
            EngineState::Stopped => return Ok(None),
            EngineState::Running(worker) => worker,
        };

        // Flag first, then wake the worker if it is parked in a post
        self.started.store(false, Ordering::Release);
        worker.token.cancel();
        worker.surface.interrupt();

        let summary = worker
            .handle
            .join()
            .map_err(|_| EngineError::WorkerPanicked)??;

        log::info!(
            "Engine stopped after {} frames ({} dropped)",
            summary.frames,
            summary.dropped
        );
        Ok(Some(summary))
    }

    /// Frames presented across all runs of this engine
    pub fn frames_presented(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Worker threads currently alive; never more than one
    pub fn live_workers(&self) -> usize {
        self.live_workers.load(Ordering::Acquire)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::error!("Engine dropped with a failed run: {err}");
        }
    }
}
