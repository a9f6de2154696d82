//! Bouncing Ball - a single ball in a rectangular arena
//!
//! Core modules:
//! - `sim`: The ball and its wall reflection rule
//! - `engine`: Start/stop lifecycle and the worker's step loop
//! - `surface`: Frame hand-off to a presentation consumer
//! - `arena`: The view that owns the ball and draws it
//! - `renderer`: Software raster shapes
//! - `settings`: Configuration for the demo binary

pub mod arena;
pub mod engine;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod surface;

pub use arena::{Arena, BallSlot, CanvasArena};
pub use engine::{Engine, RunSummary};
pub use error::{EngineError, SettingsError, SurfaceError};
pub use settings::Settings;
pub use sim::{BouncingBall, Location, Velocity};
pub use surface::{Frame, Surface};

/// Simulation constants
pub mod consts {
    use crate::sim::Velocity;

    /// Radius of a freshly created ball, in pixels
    pub const BALL_RADIUS: f32 = 50.0;
    /// Velocity of a freshly created ball, in pixels per step
    pub const INITIAL_VELOCITY: Velocity = Velocity::new(5.0, 2.0);

    /// Speed mapped to the slow end of the ball color gradient
    pub const SPEED_COLOR_MIN: f32 = 0.0;
    /// Speed mapped to the fast end of the ball color gradient
    pub const SPEED_COLOR_MAX: f32 = 20.0;
}
