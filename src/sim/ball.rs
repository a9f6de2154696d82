//! The bouncing ball entity
//!
//! One explicit Euler step per call, no time delta. Walls reflect the ball
//! without any energy loss.

use serde::{Deserialize, Serialize};

use super::physics::{Location, Velocity};
use crate::consts::{BALL_RADIUS, INITIAL_VELOCITY};

/// A ball moving inside a fixed rectangular arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BouncingBall {
    /// Center of the ball
    pub position: Location,
    pub velocity: Velocity,
    radius: f32,
    /// Arena extent (width, height) the ball is confined to
    bounds: Location,
}

impl BouncingBall {
    pub fn new(position: Location, velocity: Velocity, radius: f32, bounds: Location) -> Self {
        Self {
            position,
            velocity,
            radius,
            bounds,
        }
    }

    /// Default ball for an arena of the given extent: centered, standard
    /// radius and initial velocity.
    pub fn centered(bounds: Location) -> Self {
        Self::new(
            Location::new(bounds.x / 2.0, bounds.y / 2.0),
            INITIAL_VELOCITY,
            BALL_RADIUS,
            bounds,
        )
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn bounds(&self) -> Location {
        self.bounds
    }

    /// Advance the simulation by one step
    pub fn advance(&mut self) {
        self.position.x += self.velocity.dx;
        self.position.y += self.velocity.dy;

        reflect_axis(
            &mut self.position.x,
            &mut self.velocity.dx,
            self.radius,
            self.bounds.x,
        );
        reflect_axis(
            &mut self.position.y,
            &mut self.velocity.dy,
            self.radius,
            self.bounds.y,
        );
    }
}

/// Clamp one axis to `[radius, extent - radius]`, pointing the velocity back
/// inside when a wall is touched.
#[inline]
fn reflect_axis(pos: &mut f32, vel: &mut f32, radius: f32, extent: f32) {
    let low = radius;
    let high = extent - radius;

    // Arena narrower than the ball: nowhere to bounce
    if high < low {
        *pos = extent / 2.0;
        return;
    }

    if *pos <= low {
        *pos = low;
        *vel = vel.abs();
    } else if *pos >= high {
        *pos = high;
        *vel = -vel.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arena_200() -> BouncingBall {
        BouncingBall::new(
            Location::new(100.0, 100.0),
            Velocity::new(5.0, 2.0),
            50.0,
            Location::new(200.0, 200.0),
        )
    }

    #[test]
    fn test_single_step_no_wall() {
        let mut ball = arena_200();
        ball.advance();
        assert_eq!(ball.position, Location::new(105.0, 102.0));
        assert_eq!(ball.velocity, Velocity::new(5.0, 2.0));
    }

    #[test]
    fn test_right_wall_reflects_and_clamps() {
        let mut ball = arena_200();
        let mut steps = 0;
        while ball.velocity.dx > 0.0 {
            ball.advance();
            steps += 1;
            assert!(steps < 100, "ball never reached the right wall");
        }
        assert_eq!(ball.position.x, 150.0);
        assert_eq!(ball.velocity.dx, -5.0);
        // y is unaffected by the x bounce
        assert_eq!(ball.velocity.dy, 2.0);
    }

    #[test]
    fn test_left_wall_flips_outward_velocity() {
        let radius = 50.0;
        let mut ball = BouncingBall::new(
            Location::new(radius, 100.0),
            Velocity::new(-7.0, 1.0),
            radius,
            Location::new(400.0, 300.0),
        );
        ball.advance();
        assert_eq!(ball.velocity.dx, 7.0);
        assert_eq!(ball.position.x, radius);
    }

    #[test]
    fn test_resting_on_wall_does_not_stick() {
        // Exactly on the bottom wall, still heading outward
        let mut ball = BouncingBall::new(
            Location::new(100.0, 150.0),
            Velocity::new(0.0, 0.0),
            50.0,
            Location::new(200.0, 200.0),
        );
        ball.velocity.dy = 3.0;
        ball.advance();
        assert_eq!(ball.position.y, 150.0);
        assert_eq!(ball.velocity.dy, -3.0);

        ball.advance();
        assert_eq!(ball.position.y, 147.0);
    }

    #[test]
    fn test_inward_velocity_kept_at_wall() {
        let mut ball = BouncingBall::new(
            Location::new(60.0, 100.0),
            Velocity::new(-10.0, 0.0),
            50.0,
            Location::new(200.0, 200.0),
        );
        ball.advance();
        assert_eq!(ball.position.x, 50.0);
        assert_eq!(ball.velocity.dx, 10.0);

        // Next step moves away from the wall
        ball.advance();
        assert_eq!(ball.position.x, 60.0);
        assert_eq!(ball.velocity.dx, 10.0);
    }

    #[test]
    fn test_degenerate_axis_pins_to_middle() {
        let mut ball = BouncingBall::new(
            Location::new(40.0, 100.0),
            Velocity::new(5.0, 2.0),
            50.0,
            Location::new(80.0, 200.0),
        );
        ball.advance();
        assert_eq!(ball.position.x, 40.0);
        assert_eq!(ball.velocity.dx, 5.0);
        assert_eq!(ball.position.y, 102.0);
    }

    #[test]
    fn test_centered_defaults() {
        let ball = BouncingBall::centered(Location::new(640.0, 480.0));
        assert_eq!(ball.position, Location::new(320.0, 240.0));
        assert_eq!(ball.velocity, INITIAL_VELOCITY);
        assert_eq!(ball.radius(), BALL_RADIUS);
        assert_eq!(ball.bounds(), Location::new(640.0, 480.0));
    }

    proptest! {
        #[test]
        fn prop_ball_stays_inside_walls(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            dx in -200.0f32..200.0,
            dy in -200.0f32..200.0,
            radius in 1.0f32..100.0,
            extra_w in 0.0f32..800.0,
            extra_h in 0.0f32..800.0,
        ) {
            let bounds = Location::new(2.0 * radius + extra_w, 2.0 * radius + extra_h);
            let mut ball = BouncingBall::new(
                Location::new(x, y),
                Velocity::new(dx, dy),
                radius,
                bounds,
            );

            for _ in 0..8 {
                ball.advance();
                prop_assert!(ball.position.x >= radius);
                prop_assert!(ball.position.x <= bounds.x - radius);
                prop_assert!(ball.position.y >= radius);
                prop_assert!(ball.position.y <= bounds.y - radius);
            }
        }

        #[test]
        fn prop_speed_is_preserved(
            dx in -50.0f32..50.0,
            dy in -50.0f32..50.0,
        ) {
            let mut ball = BouncingBall::centered(Location::new(300.0, 200.0));
            ball.velocity = Velocity::new(dx, dy);
            for _ in 0..64 {
                ball.advance();
                prop_assert_eq!(ball.velocity.dx.abs(), dx.abs());
                prop_assert_eq!(ball.velocity.dy.abs(), dy.abs());
            }
        }
    }
}
