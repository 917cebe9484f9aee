//! Pointer tracking with smoothed following.
//!
//! `current` is the raw pointer position from the latest move event.
//! `previous` is the smoothed position the marker is drawn at; each frame it
//! chases `current` by a fixed fraction of the remaining distance.

use crate::geometry::Point;

/// Result of feeding one move event to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// This was the first move ever seen; the marker should snap here.
    pub first: bool,
    /// The emission throttle let this event through; one trail particle may
    /// be activated.
    pub emit: bool,
}

#[derive(Debug, Clone)]
pub struct PointerTracker {
    current: Option<Point>,
    previous: Option<Point>,
    angle: f64,
    last_emit_ms: Option<f64>,
    emit_interval_ms: f64,
    follow_factor: f64,
}

impl PointerTracker {
    pub fn new(emit_interval_ms: f64, follow_factor: f64) -> Self {
        Self {
            current: None,
            previous: None,
            angle: 0.0,
            last_emit_ms: None,
            emit_interval_ms,
            follow_factor,
        }
    }

    /// Raw pointer position of the latest move.
    pub fn current(&self) -> Option<Point> {
        self.current
    }

    /// Smoothed marker position.
    pub fn previous(&self) -> Option<Point> {
        self.previous
    }

    /// Movement direction in radians, measured from the smoothed position
    /// toward the raw one.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Both positions are known and interpolation is running.
    pub fn is_tracking(&self) -> bool {
        self.current.is_some() && self.previous.is_some()
    }

    /// Record a move event at `now_ms`.
    ///
    /// Position and angle update on every event; only particle emission is
    /// rate limited to one per `emit_interval_ms`.
    pub fn record_move(&mut self, now_ms: f64, position: Point) -> MoveOutcome {
        let first = self.current.is_none();
        let position = self.sanitize(position);
        self.current = Some(position);

        if let Some(prev) = self.previous {
            self.angle = prev.angle_to(position);
        }

        let emit = match self.last_emit_ms {
            None => true,
            Some(last) => now_ms - last > self.emit_interval_ms,
        };
        if emit {
            self.last_emit_ms = Some(now_ms);
        }

        MoveOutcome { first, emit }
    }

    /// Advance one frame.
    ///
    /// Returns the interpolated marker position while tracking. Before that,
    /// seeds `previous` from `current` and returns `None`.
    pub fn advance(&mut self) -> Option<Point> {
        match (self.previous, self.current) {
            (Some(prev), Some(curr)) => {
                let next = prev.lerp(curr, self.follow_factor);
                self.previous = Some(next);
                Some(next)
            }
            _ => {
                self.previous = self.current;
                None
            }
        }
    }

    // Non-finite coordinates fall back to the last known value so they
    // cannot poison the interpolation.
    fn sanitize(&self, position: Point) -> Point {
        let fallback = self.current.unwrap_or(Point::ZERO);
        Point::new(
            if position.x.is_finite() { position.x } else { fallback.x },
            if position.y.is_finite() { position.y } else { fallback.y },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn tracker() -> PointerTracker {
        PointerTracker::new(16.0, 0.2)
    }

    #[test]
    fn test_first_move_is_flagged() {
        let mut t = tracker();
        let first = t.record_move(0.0, Point::new(5.0, 5.0));
        assert!(first.first);
        assert!(first.emit);
        let second = t.record_move(100.0, Point::new(6.0, 5.0));
        assert!(!second.first);
    }

    #[test]
    fn test_advance_seeds_then_interpolates() {
        let mut t = tracker();
        assert_eq!(t.advance(), None);
        assert!(!t.is_tracking());

        t.record_move(0.0, Point::new(100.0, 50.0));
        // First tick after the move only seeds `previous`
        assert_eq!(t.advance(), None);
        assert!(t.is_tracking());
        assert_eq!(t.previous(), Some(Point::new(100.0, 50.0)));

        t.record_move(40.0, Point::new(200.0, 50.0));
        let p = t.advance().unwrap();
        assert!((p.x - 120.0).abs() < EPS);
        let p = t.advance().unwrap();
        assert!((p.x - 136.0).abs() < EPS);
        assert!((p.y - 50.0).abs() < EPS);
    }

    #[test]
    fn test_angle_tracks_direction() {
        let mut t = tracker();
        t.record_move(0.0, Point::new(0.0, 0.0));
        t.advance();
        t.record_move(20.0, Point::new(0.0, 10.0));
        assert!((t.angle() - std::f64::consts::FRAC_PI_2).abs() < EPS);
        t.record_move(40.0, Point::new(-10.0, 0.0));
        assert!((t.angle() - std::f64::consts::PI).abs() < EPS);
    }

    #[test]
    fn test_emission_throttle() {
        let mut t = tracker();
        let emitted = (0..1000)
            .map(|i| t.record_move(1000.0 + i as f64 * 0.01, Point::new(i as f64, 0.0)))
            .filter(|o| o.emit)
            .count();
        assert_eq!(emitted, 1);
        // Position still follows every event
        assert_eq!(t.current(), Some(Point::new(999.0, 0.0)));

        // Exactly the interval is not enough; strictly more is
        assert!(!t.record_move(1016.0, Point::ZERO).emit);
        assert!(t.record_move(1016.5, Point::ZERO).emit);
    }

    #[test]
    fn test_non_finite_coordinates() {
        let mut t = tracker();
        t.record_move(0.0, Point::new(10.0, 10.0));
        t.advance();
        t.record_move(20.0, Point::new(f64::NAN, f64::INFINITY));
        assert_eq!(t.current(), Some(Point::new(10.0, 10.0)));
        assert_eq!(t.angle(), 0.0);
    }
}
