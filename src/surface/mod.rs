//! Presentation surface abstraction
//!
//! The engine sees a surface only through the render handshake:
//! - `lock_frame`: get a drawable buffer
//! - `post_frame`: hand it back; blocks until the consumer accepts it
//! - `interrupt`: cut a pending `post_frame` short during shutdown
//! - `reset`: forget pending interrupts before a new run

pub mod frame;
pub mod vsync;

pub use frame::{Color, Frame, pack_color, unpack_color};
pub use vsync::{DisplayThread, FrameConsumer, VsyncSurface, vsync_pair};

use crate::error::SurfaceError;

/// A presentation target the engine renders into.
///
/// Implementations are shared between the controller (which may call
/// `interrupt`) and the engine worker (which drives the handshake).
pub trait Surface: Send + Sync {
    /// Acquire a frame to draw into.
    fn lock_frame(&self) -> Result<Frame, SurfaceError>;

    /// Hand a drawn frame to the consumer.
    ///
    /// Blocks until the consumer has accepted it. This is the only thing that
    /// paces the engine loop. Returns [`SurfaceError::Interrupted`] when cut
    /// short by [`Surface::interrupt`].
    fn post_frame(&self, frame: Frame) -> Result<(), SurfaceError>;

    /// Unblock a worker waiting in `post_frame`. Surfaces that never block
    /// may ignore this.
    fn interrupt(&self) {}

    /// Discard interrupts left over from an earlier run. Called by the engine
    /// before it spawns a new worker.
    fn reset(&self) {}
}
