use glam::Vec2;

/// Fraction of the remaining distance each point covers per update step.
pub const SMOOTHING: f32 = 0.2;

/// Ordered sequence of 2D points forming the trailing animation.
///
/// The head (index 0) chases the cursor directly and every later point
/// chases the point ahead of it, so positional error decays exponentially
/// along the chain. The length changes only through the explicit commands
/// (`clear`, `push`, `pop_tail`), never through `advance`.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    points: Vec<Vec2>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `count` points stacked at `origin`.
    pub fn seeded(count: usize, origin: Vec2) -> Self {
        Self {
            points: vec![origin; count],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    /// Removes the tail point. No-op on an empty chain.
    pub fn pop_tail(&mut self) -> Option<Vec2> {
        self.points.pop()
    }

    /// Moves every point a fixed fraction toward its predecessor, the head
    /// toward `cursor`. An empty chain performs no work.
    pub fn advance(&mut self, cursor: Vec2) {
        let mut target = cursor;
        for point in &mut self.points {
            *point = point.lerp(target, SMOOTHING);
            target = *point;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-5,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn advance_follows_lerp_law() {
        let mut chain = Chain::seeded(1, Vec2::new(10.0, 10.0));
        chain.advance(Vec2::new(20.0, 30.0));
        assert_close(chain.points()[0], Vec2::new(12.0, 14.0));
    }

    #[test]
    fn advance_contracts_error_by_smoothing_factor() {
        let target = Vec2::new(100.0, 0.0);
        let mut chain = Chain::seeded(1, Vec2::ZERO);
        let mut previous_error = target.length();
        for _ in 0..32 {
            chain.advance(target);
            let error = (chain.points()[0] - target).length();
            let expected = previous_error * (1.0 - SMOOTHING);
            assert!(
                (error - expected).abs() < 1e-3,
                "error {error} should be {expected}"
            );
            previous_error = error;
        }
    }

    #[test]
    fn advance_on_empty_chain_is_noop() {
        let mut chain = Chain::new();
        chain.advance(Vec2::new(5.0, 5.0));
        assert!(chain.is_empty());
    }

    #[test]
    fn advance_converges_monotonically_for_long_chain() {
        let center = Vec2::new(400.0, 300.0);
        let target = Vec2::new(100.0, 100.0);
        let mut chain = Chain::seeded(20, center);
        let before: Vec<f32> = chain.points().iter().map(|p| (*p - target).length()).collect();
        chain.advance(target);
        for (point, before) in chain.points().iter().zip(before) {
            let after = (*point - target).length();
            assert!(after < before, "distance must strictly decrease");
        }
    }

    #[test]
    fn advance_at_fixed_point_stays_put() {
        let position = Vec2::new(42.0, 17.0);
        let mut chain = Chain::seeded(20, position);
        chain.advance(position);
        for point in chain.points() {
            assert!(point.x.is_finite() && point.y.is_finite());
            assert_eq!(*point, position);
        }
    }

    #[test]
    fn pop_tail_on_empty_chain_is_noop() {
        let mut chain = Chain::new();
        assert!(chain.pop_tail().is_none());
        assert_eq!(chain.len(), 0);
    }
}
