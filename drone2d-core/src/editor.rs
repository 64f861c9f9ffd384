use glam::Vec2;
use tracing::{debug, info};

use crate::collision::distance_to_segment;
use crate::coordinates::{ScreenTransform, Viewport};
use crate::obstacles::{MIN_POLYLINE_POINTS, ObstacleStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Adds a vertex to the pending polyline.
    Primary,
    /// Adds the final vertex and commits.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    /// Click fell outside the playground viewport.
    Ignored,
    VertexAdded { pending: usize },
    Committed { index: usize, points: usize },
    /// Secondary click on a polyline that was still too short.
    Withheld,
    /// Finished polyline touches the drone's start disk; discarded.
    Blocked,
}

/// Builds polylines from point-and-click input and appends them to an
/// [`ObstacleStore`]. Committed obstacles are never touched again.
#[derive(Debug, Clone, Default)]
pub struct ObstacleEditor {
    pending: Vec<Vec2>,
    keep_clear: Option<(Vec2, f32)>,
}

impl ObstacleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses polylines passing within `radius` of `center`.
    pub fn with_keep_clear(center: Vec2, radius: f32) -> Self {
        Self {
            pending: Vec::new(),
            keep_clear: Some((center, radius)),
        }
    }

    /// Pending vertices in simulation meters.
    pub fn pending(&self) -> &[Vec2] {
        &self.pending
    }

    pub fn cancel(&mut self) {
        if !self.pending.is_empty() {
            debug!(points = self.pending.len(), "discarding pending obstacle");
        }
        self.pending.clear();
    }

    pub fn handle_click(
        &mut self,
        kind: ClickKind,
        position_px: Vec2,
        viewport: &Viewport,
        transform: &ScreenTransform,
        store: &mut ObstacleStore,
    ) -> EditorOutcome {
        if !viewport.contains(position_px) {
            debug!(x = position_px.x, y = position_px.y, "editor click outside playground");
            return EditorOutcome::Ignored;
        }

        self.pending.push(transform.to_simulation(position_px));

        match kind {
            ClickKind::Primary => EditorOutcome::VertexAdded {
                pending: self.pending.len(),
            },
            ClickKind::Secondary => {
                let points = std::mem::take(&mut self.pending);
                let count = points.len();
                if count < MIN_POLYLINE_POINTS {
                    debug!(points = count, "obstacle too short, not committed");
                    return EditorOutcome::Withheld;
                }
                if self.touches_keep_clear(&points) {
                    debug!(points = count, "obstacle blocks the start position, not committed");
                    return EditorOutcome::Blocked;
                }
                match store.push(points) {
                    Some(index) => {
                        info!(index, points = count, "obstacle committed");
                        EditorOutcome::Committed {
                            index,
                            points: count,
                        }
                    }
                    None => EditorOutcome::Withheld,
                }
            }
        }
    }

    fn touches_keep_clear(&self, points: &[Vec2]) -> bool {
        let Some((center, radius)) = self.keep_clear else {
            return false;
        };
        points
            .windows(2)
            .any(|pair| distance_to_segment(center, pair[0], pair[1]) <= radius)
    }
}
