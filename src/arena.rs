//! The arena: owner of the drawable area and of the ball
//!
//! The engine never owns the ball. It asks the arena's [`BallSlot`] to create
//! one if missing, then mutates it in place every step.

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::renderer::draw_ball;
use crate::sim::{BouncingBall, Location};
use crate::surface::{Color, Frame};

/// Get-or-create storage for the arena's single ball
#[derive(Debug, Default)]
pub struct BallSlot {
    ball: Mutex<Option<BouncingBall>>,
}

impl BallSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ball(ball: BouncingBall) -> Self {
        Self {
            ball: Mutex::new(Some(ball)),
        }
    }

    /// Create the ball if the slot is empty. Returns `true` if it was created.
    pub fn get_or_insert_with(&self, create: impl FnOnce() -> BouncingBall) -> bool {
        let mut slot = self.ball.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(create());
        true
    }

    /// Step the ball, if there is one
    pub fn advance(&self) -> bool {
        match self.ball.lock().as_mut() {
            Some(ball) => {
                ball.advance();
                true
            }
            None => false,
        }
    }

    /// Run `f` against the current ball without copying it
    pub fn with<R>(&self, f: impl FnOnce(&BouncingBall) -> R) -> Option<R> {
        self.ball.lock().as_ref().map(f)
    }

    pub fn snapshot(&self) -> Option<BouncingBall> {
        self.ball.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.ball.lock().is_none()
    }

    /// Remove the ball, e.g. when the view is torn down
    pub fn take(&self) -> Option<BouncingBall> {
        self.ball.lock().take()
    }
}

/// The view the engine renders and simulates in.
pub trait Arena: Send + Sync {
    /// Current drawable width in pixels
    fn width(&self) -> f32;
    /// Current drawable height in pixels
    fn height(&self) -> f32;
    /// Get-or-create storage for the ball; only the engine worker mutates it
    fn ball_slot(&self) -> &BallSlot;
    /// Render the current state into `frame`
    fn draw(&self, frame: &mut Frame);
}

pub const DEFAULT_BACKGROUND: Color = [0.05, 0.05, 0.08, 1.0];

/// Plain arena: solid background with the ball on top
#[derive(Debug)]
pub struct CanvasArena {
    // f32 bits, so a UI thread can resize while the engine runs
    width: AtomicU32,
    height: AtomicU32,
    background: Color,
    slot: BallSlot,
}

impl CanvasArena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: AtomicU32::new(width.to_bits()),
            height: AtomicU32::new(height.to_bits()),
            background: DEFAULT_BACKGROUND,
            slot: BallSlot::new(),
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Seed the arena with an existing ball
    pub fn with_ball(mut self, ball: BouncingBall) -> Self {
        self.slot = BallSlot::with_ball(ball);
        self
    }

    /// Change the view size. A running engine keeps the bounds it started with.
    pub fn resize(&self, width: f32, height: f32) {
        self.width.store(width.to_bits(), Ordering::Relaxed);
        self.height.store(height.to_bits(), Ordering::Relaxed);
    }

    pub fn extent(&self) -> Location {
        Location::new(self.width(), self.height())
    }
}

impl Arena for CanvasArena {
    fn width(&self) -> f32 {
        f32::from_bits(self.width.load(Ordering::Relaxed))
    }

    fn height(&self) -> f32 {
        f32::from_bits(self.height.load(Ordering::Relaxed))
    }

    fn ball_slot(&self) -> &BallSlot {
        &self.slot
    }

    fn draw(&self, frame: &mut Frame) {
        frame.clear(self.background);
        self.slot.with(|ball| draw_ball(frame, ball));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Velocity;
    use crate::surface::pack_color;

    #[test]
    fn test_slot_creates_once() {
        let slot = BallSlot::new();
        assert!(slot.is_empty());
        assert!(!slot.advance());

        assert!(slot.get_or_insert_with(|| BouncingBall::centered(Location::new(200.0, 200.0))));
        assert!(!slot.get_or_insert_with(|| panic!("slot already holds a ball")));

        assert!(slot.advance());
        let ball = slot.snapshot().unwrap();
        assert_eq!(ball.position, Location::new(105.0, 102.0));
    }

    #[test]
    fn test_slot_take() {
        let slot = BallSlot::with_ball(BouncingBall::centered(Location::new(100.0, 100.0)));
        assert!(slot.take().is_some());
        assert!(slot.is_empty());
        assert_eq!(slot.with(|b| b.radius()), None);
    }

    #[test]
    fn test_resize() {
        let arena = CanvasArena::new(640.0, 480.0);
        assert_eq!(arena.extent(), Location::new(640.0, 480.0));
        arena.resize(800.0, 600.0);
        assert_eq!((arena.width(), arena.height()), (800.0, 600.0));
    }

    #[test]
    fn test_draw_background_and_ball() {
        let background = [0.0, 0.0, 0.0, 1.0];
        let arena = CanvasArena::new(100.0, 100.0)
            .with_background(background)
            .with_ball(BouncingBall::new(
                Location::new(30.0, 30.0),
                Velocity::new(1.0, 1.0),
                10.0,
                Location::new(100.0, 100.0),
            ));

        let mut frame = Frame::new(100, 100);
        arena.draw(&mut frame);
        assert_eq!(frame.pixel(90, 90), Some(pack_color(background)));
        assert_ne!(frame.pixel(30, 30), Some(pack_color(background)));
    }

    #[test]
    fn test_draw_without_ball_is_background_only() {
        let arena = CanvasArena::new(10.0, 10.0);
        let mut frame = Frame::new(10, 10);
        arena.draw(&mut frame);
        let bg = pack_color(DEFAULT_BACKGROUND);
        assert!(frame.pixels().iter().all(|&px| px == bg));
    }
}
