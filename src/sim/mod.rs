//! Simulation module
//!
//! The whole model is a single ball and its wall reflection rule:
//! - Fixed implicit timestep (one call, one step)
//! - No rendering or threading dependencies

pub mod ball;
pub mod physics;

pub use ball::BouncingBall;
pub use physics::{Location, Velocity};
