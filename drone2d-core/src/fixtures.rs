use std::f32::consts::PI;

use fastrand::Rng;
use glam::{Vec2, vec2};

use crate::collision::distance_to_segment;
use crate::obstacles::Polyline;

const MIN_LENGTH: f32 = 0.8;
const MAX_LENGTH: f32 = 2.0;
const WALL_MARGIN: f32 = 0.5;
const ATTEMPTS_PER_FIXTURE: usize = 32;

/// Seeded layout of straight obstacles inside the playground.
#[derive(Debug, Clone)]
pub struct FixtureScatter {
    seed: u64,
}

impl FixtureScatter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generates up to `count` segments fully inside `playground` (with a
    /// margin from the walls) that stay at least `clearance` away from
    /// `keep_clear`. Fewer are returned when the space runs out.
    pub fn scatter(
        &self,
        count: usize,
        playground: Vec2,
        keep_clear: Vec2,
        clearance: f32,
    ) -> Vec<Polyline> {
        let mut rng = Rng::with_seed(self.seed);
        let mut fixtures = Vec::with_capacity(count);
        let min = Vec2::splat(WALL_MARGIN);
        let max = playground - Vec2::splat(WALL_MARGIN);
        if max.x <= min.x || max.y <= min.y {
            return fixtures;
        }

        let mut attempts = 0;
        while fixtures.len() < count && attempts < count * ATTEMPTS_PER_FIXTURE {
            attempts += 1;

            let start = vec2(
                min.x + rng.f32() * (max.x - min.x),
                min.y + rng.f32() * (max.y - min.y),
            );
            let angle = rng.f32() * 2.0 * PI;
            let length = MIN_LENGTH + rng.f32() * (MAX_LENGTH - MIN_LENGTH);
            let end = start + Vec2::from_angle(angle) * length;

            let inside = end.cmpge(min).all() && end.cmple(max).all();
            if !inside || distance_to_segment(keep_clear, start, end) < clearance {
                continue;
            }

            if let Some(polyline) = Polyline::new(vec![start, end]) {
                fixtures.push(polyline);
            }
        }

        fixtures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scatter(seed: u64, count: usize) -> Vec<Polyline> {
        FixtureScatter::new(seed).scatter(count, vec2(8.0, 8.0), vec2(4.0, 1.0), 1.0)
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(scatter(42, 6), scatter(42, 6));
        assert_ne!(scatter(42, 6), scatter(43, 6));
    }

    #[test]
    fn fixtures_stay_inside_and_clear_of_start() {
        let fixtures = scatter(7, 10);
        assert!(!fixtures.is_empty());
        for fixture in &fixtures {
            let points = fixture.points();
            assert_eq!(points.len(), 2);
            for p in points {
                assert!(p.x >= WALL_MARGIN && p.x <= 8.0 - WALL_MARGIN);
                assert!(p.y >= WALL_MARGIN && p.y <= 8.0 - WALL_MARGIN);
            }
            assert!(distance_to_segment(vec2(4.0, 1.0), points[0], points[1]) >= 1.0);
            let length = points[0].distance(points[1]);
            assert!(length >= MIN_LENGTH - 1e-4 && length <= MAX_LENGTH + 1e-4);
        }
    }

    #[test]
    fn tiny_playground_yields_nothing() {
        let fixtures = FixtureScatter::new(1).scatter(5, vec2(0.5, 0.5), Vec2::ZERO, 0.0);
        assert!(fixtures.is_empty());
    }

    #[test]
    fn zero_count_yields_nothing() {
        assert!(scatter(42, 0).is_empty());
    }
}
