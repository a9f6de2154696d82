//! Software rendering into surface frames

pub mod shapes;

pub use shapes::{draw_ball, fill_circle, velocity_color};
