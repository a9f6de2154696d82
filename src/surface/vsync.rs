//! Channel-backed presentation surface with display backpressure
//!
//! ```text
//!   Engine worker                         Display
//!   ─────────────                         ───────
//!   lock_frame()  <── recycle (bounded) ── release()
//!   post_frame()  ── present (rendezvous) ─> recv()
//!        ^
//!        └── interrupt (bounded 1) <── Engine::stop()
//! ```
//!
//! The present channel has zero capacity, so a post only completes once the
//! consumer actually takes the frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, select};
use parking_lot::Mutex;

use super::{Frame, Surface};
use crate::error::SurfaceError;

/// Create a connected surface/consumer pair for frames of the given size.
///
/// `pool_size` caps how many released buffers are kept for reuse.
pub fn vsync_pair(width: u32, height: u32, pool_size: usize) -> (VsyncSurface, FrameConsumer) {
    let (present_tx, present_rx) = bounded(0);
    let (recycle_tx, recycle_rx) = bounded(pool_size.max(1));
    let (interrupt_tx, interrupt_rx) = bounded(1);

    let surface = VsyncSurface {
        width,
        height,
        present_tx,
        recycle_rx,
        interrupt_tx,
        interrupt_rx,
        next_sequence: AtomicU64::new(0),
    };
    let consumer = FrameConsumer {
        present_rx,
        recycle_tx,
    };
    (surface, consumer)
}

/// Producer half: the [`Surface`] the engine draws into
#[derive(Debug)]
pub struct VsyncSurface {
    width: u32,
    height: u32,
    present_tx: Sender<Frame>,
    recycle_rx: Receiver<Frame>,
    interrupt_tx: Sender<()>,
    interrupt_rx: Receiver<()>,
    next_sequence: AtomicU64,
}

impl VsyncSurface {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Surface for VsyncSurface {
    fn lock_frame(&self) -> Result<Frame, SurfaceError> {
        let mut frame = self
            .recycle_rx
            .try_recv()
            .unwrap_or_else(|_| Frame::new(self.width, self.height));
        frame.ensure_size(self.width, self.height);
        frame.set_sequence(self.next_sequence.fetch_add(1, Ordering::Relaxed));
        Ok(frame)
    }

    fn post_frame(&self, frame: Frame) -> Result<(), SurfaceError> {
        select! {
            send(self.present_tx, frame) -> res => res.map_err(|_| SurfaceError::Disconnected),
            recv(self.interrupt_rx) -> _ => Err(SurfaceError::Interrupted),
        }
    }

    fn interrupt(&self) {
        // Coalesces: a pending signal already covers this one
        let _ = self.interrupt_tx.try_send(());
    }

    fn reset(&self) {
        while self.interrupt_rx.try_recv().is_ok() {}
    }
}

/// Consumer half: accepts posted frames and returns their buffers
#[derive(Debug)]
pub struct FrameConsumer {
    present_rx: Receiver<Frame>,
    recycle_tx: Sender<Frame>,
}

impl FrameConsumer {
    /// Block until the engine posts a frame
    pub fn recv(&self) -> Result<Frame, SurfaceError> {
        self.present_rx.recv().map_err(|_| SurfaceError::Disconnected)
    }

    /// Wait up to `timeout` for a frame; `Ok(None)` when nothing was posted
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Frame>, SurfaceError> {
        match self.present_rx.recv_timeout(timeout) {
            Ok(frame) => Ok(Some(frame)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SurfaceError::Disconnected),
        }
    }

    /// Return a presented frame's buffer to the surface. Dropped when the
    /// pool is already full.
    pub fn release(&self, frame: Frame) {
        let _ = self.recycle_tx.try_send(frame);
    }
}

/// Emulated display: accepts at most one frame per refresh period
///
/// Runs a [`FrameConsumer`] on its own thread and keeps the most recently
/// presented frame around for inspection.
pub struct DisplayThread {
    running: Arc<AtomicBool>,
    presented: Arc<AtomicU64>,
    last_frame: Arc<Mutex<Option<Frame>>>,
    handle: Option<JoinHandle<()>>,
}

impl DisplayThread {
    /// Start presenting at `refresh_hz` frames per second
    pub fn spawn(consumer: FrameConsumer, refresh_hz: u32) -> std::io::Result<Self> {
        let period = Duration::from_secs_f64(1.0 / f64::from(refresh_hz.max(1)));
        let running = Arc::new(AtomicBool::new(true));
        let presented = Arc::new(AtomicU64::new(0));
        let last_frame = Arc::new(Mutex::new(None));

        let thread_running = Arc::clone(&running);
        let thread_presented = Arc::clone(&presented);
        let thread_last = Arc::clone(&last_frame);

        let handle = thread::Builder::new()
            .name("display".into())
            .spawn(move || {
                Self::present_loop(consumer, period, thread_running, thread_presented, thread_last);
            })?;

        log::debug!("Display thread started at {refresh_hz} Hz");
        Ok(Self {
            running,
            presented,
            last_frame,
            handle: Some(handle),
        })
    }

    fn present_loop(
        consumer: FrameConsumer,
        period: Duration,
        running: Arc<AtomicBool>,
        presented: Arc<AtomicU64>,
        last_frame: Arc<Mutex<Option<Frame>>>,
    ) {
        let mut next_vsync = Instant::now();

        while running.load(Ordering::Acquire) {
            match consumer.recv_timeout(period) {
                Ok(Some(frame)) => {
                    if let Some(previous) = last_frame.lock().replace(frame) {
                        consumer.release(previous);
                    }
                    presented.fetch_add(1, Ordering::Release);
                }
                Ok(None) => continue,
                Err(_) => break,
            }

            // Hold off the next accept until the next refresh
            next_vsync += period;
            let now = Instant::now();
            if next_vsync > now {
                thread::sleep(next_vsync - now);
            } else {
                next_vsync = now;
            }
        }
    }

    /// Frames accepted so far
    pub fn presented(&self) -> u64 {
        self.presented.load(Ordering::Acquire)
    }

    /// Copy of the most recently presented frame
    pub fn last_frame(&self) -> Option<Frame> {
        self.last_frame.lock().clone()
    }

    /// Stop accepting frames and join the display thread.
    ///
    /// Dropping the consumer disconnects the surface, so a running engine
    /// will see its next post fail.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for DisplayThread {
    fn drop(&mut self) {
        self.stop();
    }
}
