use glam::Vec2;

use crate::obstacles::ObstacleStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectionMode {
    /// Only points between the segment endpoints count.
    #[default]
    Segment,
    /// The segment is extended to an infinite line.
    FullLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollisionHit {
    pub obstacle: usize,
    pub segment: usize,
    pub points: Vec<Vec2>,
}

/// Intersection points of a circle with the segment `a`-`b`: zero, one
/// (tangent, or a single crossing inside the segment) or two.
pub fn circle_segment_intersections(
    center: Vec2,
    radius: f32,
    a: Vec2,
    b: Vec2,
    mode: IntersectionMode,
) -> Vec<Vec2> {
    let d = b - a;
    let f = a - center;

    let qa = d.dot(d);
    if qa <= f32::EPSILON {
        // Degenerate segment: a single point.
        return if f.length() <= radius { vec![a] } else { Vec::new() };
    }
    let qb = 2.0 * f.dot(d);
    let qc = f.dot(f) - radius * radius;

    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let keep = |t: f32| match mode {
        IntersectionMode::Segment => (0.0..=1.0).contains(&t),
        IntersectionMode::FullLine => true,
    };

    let mut points = Vec::with_capacity(2);
    if discriminant == 0.0 {
        let t = -qb / (2.0 * qa);
        if keep(t) {
            points.push(a + d * t);
        }
        return points;
    }

    let root = discriminant.sqrt();
    for t in [(-qb - root) / (2.0 * qa), (-qb + root) / (2.0 * qa)] {
        if keep(t) {
            points.push(a + d * t);
        }
    }
    points
}

/// Checks every segment of every obstacle and returns the first one the
/// circle touches.
pub fn first_collision(center: Vec2, radius: f32, obstacles: &ObstacleStore) -> Option<CollisionHit> {
    for (obstacle, polyline) in obstacles.iter().enumerate() {
        for (segment, (a, b)) in polyline.segments().enumerate() {
            let points =
                circle_segment_intersections(center, radius, a, b, IntersectionMode::Segment);
            if !points.is_empty() {
                return Some(CollisionHit {
                    obstacle,
                    segment,
                    points,
                });
            }
        }
    }
    None
}

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    let length_squared = d.length_squared();
    if length_squared <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(d) / length_squared).clamp(0.0, 1.0);
    point.distance(a + d * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::vec2;

    const A: Vec2 = Vec2::new(-1.0, 0.0);
    const B: Vec2 = Vec2::new(1.0, 0.0);

    #[test]
    fn tangent_circle_touches_once() {
        let points =
            circle_segment_intersections(vec2(0.0, 1.0), 1.0, A, B, IntersectionMode::Segment);
        assert_eq!(points, vec![vec2(0.0, 0.0)]);
    }

    #[test]
    fn distant_circle_misses() {
        let points =
            circle_segment_intersections(vec2(0.0, 1.5), 1.0, A, B, IntersectionMode::Segment);
        assert!(points.is_empty());
    }

    #[test]
    fn crossing_circle_hits_twice() {
        let points =
            circle_segment_intersections(vec2(0.0, 0.5), 1.0, A, B, IntersectionMode::Segment);
        assert_eq!(points.len(), 2);
        let half_chord = 0.75_f32.sqrt();
        assert_abs_diff_eq!(points[0].x, -half_chord, epsilon = 1e-5);
        assert_abs_diff_eq!(points[1].x, half_chord, epsilon = 1e-5);
        assert_abs_diff_eq!(points[0].y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn segment_mode_ignores_crossings_beyond_endpoints() {
        let a = vec2(-0.5, 0.0);
        let b = vec2(0.5, 0.0);
        let center = vec2(0.0, 0.5);
        assert!(circle_segment_intersections(center, 1.0, a, b, IntersectionMode::Segment).is_empty());
        assert_eq!(
            circle_segment_intersections(center, 1.0, a, b, IntersectionMode::FullLine).len(),
            2
        );
    }

    #[test]
    fn segment_ending_inside_circle_hits_once() {
        let points = circle_segment_intersections(
            Vec2::ZERO,
            1.0,
            Vec2::ZERO,
            vec2(3.0, 0.0),
            IntersectionMode::Segment,
        );
        assert_eq!(points.len(), 1);
        assert_abs_diff_eq!(points[0].x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn degenerate_segment_acts_as_point() {
        let p = vec2(0.2, 0.0);
        assert_eq!(
            circle_segment_intersections(Vec2::ZERO, 0.3, p, p, IntersectionMode::Segment),
            vec![p]
        );
        assert!(
            circle_segment_intersections(Vec2::ZERO, 0.1, p, p, IntersectionMode::Segment)
                .is_empty()
        );
    }

    #[test]
    fn first_collision_reports_obstacle_and_segment() {
        let mut store = ObstacleStore::with_playground(vec2(8.0, 8.0));
        store.push(vec![vec2(2.0, 2.0), vec2(2.0, 4.0), vec2(4.0, 4.0)]);

        assert_eq!(first_collision(vec2(4.0, 4.0), 0.3, &store).map(|hit| hit.obstacle), Some(1));
        let hit = first_collision(vec2(3.0, 4.1), 0.3, &store).expect("touches top edge");
        assert_eq!((hit.obstacle, hit.segment), (1, 1));

        let wall = first_collision(vec2(7.8, 5.0), 0.3, &store).expect("touches right wall");
        assert_eq!((wall.obstacle, wall.segment), (0, 1));

        assert!(first_collision(vec2(6.0, 6.0), 0.3, &store).is_none());
    }

    #[test]
    fn distance_to_segment_clamps_to_endpoints() {
        assert_abs_diff_eq!(distance_to_segment(vec2(0.0, 2.0), A, B), 2.0);
        assert_abs_diff_eq!(distance_to_segment(vec2(3.0, 0.0), A, B), 2.0);
        assert_abs_diff_eq!(distance_to_segment(vec2(-1.0, -1.0), A, A), 1.0);
    }
}
