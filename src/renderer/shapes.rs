//! Raster shapes for the software renderer

use glam::Vec2;

use crate::consts::{SPEED_COLOR_MAX, SPEED_COLOR_MIN};
use crate::sim::BouncingBall;
use crate::surface::{Color, Frame};

/// Gradient stops, slow to fast: blue, cyan, green, yellow, red
const SPEED_GRADIENT: [[f32; 3]; 5] = [
    [0.2, 0.4, 1.0],
    [0.2, 0.8, 1.0],
    [0.2, 0.8, 0.4],
    [1.0, 0.8, 0.2],
    [1.0, 0.3, 0.2],
];

/// Ball color for a given speed, linearly blended between gradient stops
pub fn velocity_color(speed: f32, alpha: f32) -> Color {
    let t = ((speed - SPEED_COLOR_MIN) / (SPEED_COLOR_MAX - SPEED_COLOR_MIN)).clamp(0.0, 1.0);

    let last = SPEED_GRADIENT.len() - 1;
    let scaled = t * last as f32;
    let i = (scaled.floor() as usize).min(last - 1);
    let u = scaled - i as f32;
    let (from, to) = (SPEED_GRADIENT[i], SPEED_GRADIENT[i + 1]);
    let [r, g, b] = [0, 1, 2].map(|c| from[c] + (to[c] - from[c]) * u);

    [r, g, b, alpha]
}

/// Fill a circle with a one-pixel anti-aliased edge
pub fn fill_circle(frame: &mut Frame, center: Vec2, radius: f32, color: Color) {
    if radius <= 0.0 || frame.width() == 0 || frame.height() == 0 {
        return;
    }

    let max_x = (frame.width() - 1) as f32;
    let max_y = (frame.height() - 1) as f32;
    let x0 = (center.x - radius - 1.0).floor().clamp(0.0, max_x) as u32;
    let x1 = (center.x + radius + 1.0).ceil().clamp(0.0, max_x) as u32;
    let y0 = (center.y - radius - 1.0).floor().clamp(0.0, max_y) as u32;
    let y1 = (center.y + radius + 1.0).ceil().clamp(0.0, max_y) as u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            // Sample at pixel centers
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
            if coverage > 0.0 {
                frame.blend_pixel(x, y, color, coverage);
            }
        }
    }
}

/// Draw the ball, colored by its current speed
pub fn draw_ball(frame: &mut Frame, ball: &BouncingBall) {
    let color = velocity_color(ball.velocity.speed(), 1.0);
    fill_circle(frame, ball.position.into(), ball.radius(), color);
}
