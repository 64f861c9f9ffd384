use glam::{Vec2, vec2};
use serde::{Deserialize, Serialize};

/// Maps simulation meters (origin bottom-left, y up) to display pixels
/// (origin top-left, y down) and back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenTransform {
    pub meters_to_pixels: f32,
    pub screen_height_px: f32,
}

impl ScreenTransform {
    pub fn new(meters_to_pixels: f32, screen_height_px: f32) -> Self {
        Self {
            meters_to_pixels,
            screen_height_px,
        }
    }

    pub fn to_display(&self, meters: Vec2) -> Vec2 {
        vec2(
            meters.x * self.meters_to_pixels,
            self.screen_height_px - meters.y * self.meters_to_pixels,
        )
    }

    pub fn to_simulation(&self, pixels: Vec2) -> Vec2 {
        vec2(
            pixels.x / self.meters_to_pixels,
            (self.screen_height_px - pixels.y) / self.meters_to_pixels,
        )
    }

    pub fn to_display_all(&self, points: &[Vec2]) -> Vec<Vec2> {
        points.iter().map(|&p| self.to_display(p)).collect()
    }

    pub fn to_simulation_all(&self, points: &[Vec2]) -> Vec<Vec2> {
        points.iter().map(|&p| self.to_simulation(p)).collect()
    }

    pub fn length_to_display(&self, meters: f32) -> f32 {
        meters * self.meters_to_pixels
    }
}

/// Axis-aligned rectangle in display pixels. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: vec2(width, height),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}
