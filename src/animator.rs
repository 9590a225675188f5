//! Tween animation of a window rectangle toward a target.
//!
//! A single animation slot tweens x, y, width and height independently
//! from a start rect to a target rect with a cubic ease-out curve.
//! Starting a new animation replaces the old one (the replacement starts
//! from whatever rect the caller reads at that moment, not from the
//! abandoned target). The driver feeds ticks; the animator never touches
//! a clock itself, so the curve is testable with synthetic time.

use crate::command::{Rect, WindowId};
use std::time::Duration;

/// Nominal time between animation frames.
pub const TICK: Duration = Duration::from_millis(10);

/// One emitted animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub window: WindowId,
    pub rect: Rect,
    /// Set on the final frame; the rect then equals the target exactly.
    pub last: bool,
}

#[derive(Debug)]
struct Animation {
    window: WindowId,
    from: Rect,
    to: Rect,
    duration: Duration,
    elapsed: Duration,
}

/// The process-wide animation slot (at most one window animates at a time).
#[derive(Debug, Default)]
pub struct Animator {
    current: Option<Animation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm an animation from `from` to `to`, replacing any in-flight one.
    pub fn start(&mut self, window: WindowId, from: Rect, to: Rect, duration: Duration) {
        self.current = Some(Animation {
            window,
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        });
    }

    /// Disarm without emitting a frame.
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Disarm only if the in-flight animation targets `window`.
    pub fn cancel_window(&mut self, window: WindowId) {
        if self.current.as_ref().is_some_and(|a| a.window == window) {
            self.current = None;
        }
    }

    /// Whether an animation is in flight.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Window the in-flight animation targets, if any.
    pub fn target(&self) -> Option<WindowId> {
        self.current.as_ref().map(|a| a.window)
    }

    /// Advance by `dt` and emit the next frame, or `None` when idle.
    ///
    /// Progress is clamped at 1; the frame emitted there is the target
    /// rect itself and the slot disarms.
    pub fn tick(&mut self, dt: Duration) -> Option<Frame> {
        let anim = self.current.as_mut()?;
        anim.elapsed += dt;

        let u = if anim.duration.is_zero() {
            1.0
        } else {
            (anim.elapsed.as_secs_f64() / anim.duration.as_secs_f64()).min(1.0)
        };

        let frame = if u >= 1.0 {
            Frame {
                window: anim.window,
                rect: anim.to,
                last: true,
            }
        } else {
            let t = ease_out_cubic(u);
            Frame {
                window: anim.window,
                rect: lerp_rect(anim.from, anim.to, t),
                last: false,
            }
        };

        if frame.last {
            self.current = None;
        }
        Some(frame)
    }
}

fn ease_out_cubic(u: f64) -> f64 {
    1.0 - (1.0 - u).powi(3)
}

fn lerp(a: i32, b: i32, t: f64) -> i32 {
    (a as f64 + (b - a) as f64 * t).round() as i32
}

fn lerp_rect(from: Rect, to: Rect, t: f64) -> Rect {
    Rect {
        x: lerp(from.x, to.x, t),
        y: lerp(from.y, to.y, t),
        width: lerp(from.width, to.width, t),
        height: lerp(from.height, to.height, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FROM: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };
    const TO: Rect = Rect {
        x: 80,
        y: 160,
        width: 240,
        height: 320,
    };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn tick_when_idle_returns_none() {
        let mut anim = Animator::new();
        assert!(!anim.is_active());
        assert_eq!(anim.tick(TICK), None);
    }

    #[test]
    fn completes_exactly_on_the_target() {
        let mut anim = Animator::new();
        anim.start(WindowId(1), FROM, TO, ms(100));

        let mut last = None;
        for _ in 0..10 {
            last = anim.tick(ms(10));
        }
        let frame = last.unwrap();
        assert!(frame.last);
        assert_eq!(frame.rect, TO);
        assert!(!anim.is_active());
        assert_eq!(anim.tick(TICK), None);
    }

    #[test]
    fn half_time_covers_seven_eighths_of_the_distance() {
        // Ease-out-cubic at u = 0.5 is 1 - 0.5^3 = 0.875.
        let mut anim = Animator::new();
        anim.start(WindowId(1), FROM, TO, ms(100));
        let frame = anim.tick(ms(50)).unwrap();
        assert!(!frame.last);
        assert_eq!(
            frame.rect,
            Rect {
                x: 70,
                y: 140,
                width: 210,
                height: 280
            }
        );
    }

    #[test]
    fn eases_out_faster_than_linear_at_the_start() {
        let mut anim = Animator::new();
        anim.start(WindowId(1), FROM, TO, ms(100));
        let frame = anim.tick(ms(10)).unwrap();
        // Linear would reach x = 8 after a tenth of the duration.
        assert!(frame.rect.x > 8, "got x = {}", frame.rect.x);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut anim = Animator::new();
        anim.start(WindowId(1), FROM, TO, ms(100));
        let mut prev = FROM.x;
        loop {
            let frame = anim.tick(ms(10)).unwrap();
            assert!(frame.rect.x >= prev);
            assert!(frame.rect.x <= TO.x);
            prev = frame.rect.x;
            if frame.last {
                break;
            }
        }
    }

    #[test]
    fn restart_replaces_the_inflight_animation() {
        let mut anim = Animator::new();
        anim.start(WindowId(1), FROM, TO, ms(100));
        anim.tick(ms(30));
        anim.tick(ms(30));

        let other = Rect {
            x: -40,
            y: 0,
            width: 100,
            height: 100,
        };
        anim.start(WindowId(2), FROM, other, ms(100));
        assert_eq!(anim.target(), Some(WindowId(2)));

        // Elapsed restarted: a fresh 10 ms tick is early progress again.
        let frame = anim.tick(ms(10)).unwrap();
        assert_eq!(frame.window, WindowId(2));
        assert!(!frame.last);
        assert!(frame.rect.x > other.x, "moving toward -40 from 0");

        let frame = anim.tick(ms(90)).unwrap();
        assert!(frame.last);
        assert_eq!(frame.rect, other);
    }

    #[test]
    fn cancel_window_matches_only_its_target() {
        let mut anim = Animator::new();
        anim.start(WindowId(1), FROM, TO, ms(100));
        anim.cancel_window(WindowId(2));
        assert!(anim.is_active());
        anim.cancel_window(WindowId(1));
        assert!(!anim.is_active());
        assert_eq!(anim.tick(TICK), None);
    }

    #[test]
    fn zero_duration_finishes_on_the_first_tick() {
        let mut anim = Animator::new();
        anim.start(WindowId(1), FROM, TO, Duration::ZERO);
        let frame = anim.tick(TICK).unwrap();
        assert!(frame.last);
        assert_eq!(frame.rect, TO);
    }

    #[test]
    fn negative_coordinates_interpolate() {
        let mut anim = Animator::new();
        let to = Rect {
            x: -100,
            y: -50,
            width: 200,
            height: 100,
        };
        anim.start(WindowId(1), FROM, to, ms(100));
        let frame = anim.tick(ms(100)).unwrap();
        assert_eq!(frame.rect, to);
    }
}
