use glam::{Vec2, vec2};
use serde::{Deserialize, Serialize};

pub const MIN_POLYLINE_POINTS: usize = 2;

/// Open polyline in simulation meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Vec2>,
}

impl Polyline {
    /// Returns `None` when fewer than two points are given.
    pub fn new(points: Vec<Vec2>) -> Option<Self> {
        if points.len() < MIN_POLYLINE_POINTS {
            return None;
        }
        Some(Self { points })
    }

    /// Rectangle from the origin to `size`, closed by repeating the first corner.
    pub fn rectangle(size: Vec2) -> Self {
        Self {
            points: vec![
                Vec2::ZERO,
                vec2(size.x, 0.0),
                size,
                vec2(0.0, size.y),
                Vec2::ZERO,
            ],
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }
}

/// Append-only list of obstacles. Index 0 is always the playground boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleStore {
    obstacles: Vec<Polyline>,
}

impl ObstacleStore {
    pub fn new(boundary: Polyline) -> Self {
        Self {
            obstacles: vec![boundary],
        }
    }

    pub fn with_playground(size: Vec2) -> Self {
        Self::new(Polyline::rectangle(size))
    }

    pub fn boundary(&self) -> &Polyline {
        &self.obstacles[0]
    }

    /// Appends a new obstacle and returns its index, or `None` when the
    /// points cannot form a polyline.
    pub fn push(&mut self, points: Vec<Vec2>) -> Option<usize> {
        let polyline = Polyline::new(points)?;
        self.obstacles.push(polyline);
        Some(self.obstacles.len() - 1)
    }

    pub fn push_polyline(&mut self, polyline: Polyline) -> usize {
        self.obstacles.push(polyline);
        self.obstacles.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Polyline> {
        self.obstacles.get(index)
    }

    pub fn as_slice(&self) -> &[Polyline] {
        &self.obstacles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polyline> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_first_and_closed() {
        let store = ObstacleStore::with_playground(vec2(8.0, 8.0));
        assert_eq!(store.len(), 1);
        let boundary = store.boundary();
        assert_eq!(boundary.points().len(), 5);
        assert_eq!(boundary.points().first(), boundary.points().last());
        assert_eq!(boundary.segment_count(), 4);
    }

    #[test]
    fn short_polylines_are_withheld() {
        let mut store = ObstacleStore::with_playground(vec2(8.0, 8.0));
        assert_eq!(store.push(vec![]), None);
        assert_eq!(store.push(vec![vec2(1.0, 1.0)]), None);
        assert_eq!(store.len(), 1);

        assert_eq!(store.push(vec![vec2(1.0, 1.0), vec2(2.0, 2.0)]), Some(1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn segments_follow_point_order() {
        let polyline = Polyline::new(vec![vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(1.0, 1.0)])
            .expect("three points");
        let segments: Vec<_> = polyline.segments().collect();
        assert_eq!(
            segments,
            vec![
                (vec2(0.0, 0.0), vec2(1.0, 0.0)),
                (vec2(1.0, 0.0), vec2(1.0, 1.0)),
            ]
        );
    }
}
