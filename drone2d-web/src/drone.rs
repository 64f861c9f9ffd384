use drone2d_core::{DroneState, ScreenTransform};
use macroquad::prelude::*;

use crate::to_screen_vec;

#[derive(Debug, Clone)]
pub struct DroneDrawConfig {
    pub stroke_ratio: f32,         // stroke width as a fraction of radius
    pub line_start_ratio: f32,     // where the nose line begins, fraction of radius
    pub line_length_ratio: f32,    // nose line length as a fraction of radius
    pub line_thickness_ratio: f32, // nose line thickness as a fraction of radius
    pub stroke_color: Color,
    pub fill_color: Color,
}

impl Default for DroneDrawConfig {
    fn default() -> Self {
        Self {
            stroke_ratio: 0.4,
            line_start_ratio: 1.0 / 3.0,
            line_length_ratio: 2.0 / 3.0,
            line_thickness_ratio: 0.4,
            stroke_color: BLACK,
            fill_color: WHITE,
        }
    }
}

/// Nose direction in screen space (y down).
pub fn screen_heading(drone: &DroneState) -> Vec2 {
    let nose = to_screen_vec(drone.nose_direction());
    let heading = vec2(nose.x, -nose.y);
    if heading.length_squared() <= f32::EPSILON {
        return vec2(0.0, -1.0);
    }
    heading.normalize_or_zero()
}

/// Screen-space geometry of the drone outline and its nose marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneShape {
    pub center: Vec2,
    pub ring_outer: f32,
    pub ring_inner: f32,
    pub nose_from: Vec2,
    pub nose_to: Vec2,
    pub nose_width: f32,
}

impl DroneShape {
    pub fn new(drone: &DroneState, transform: &ScreenTransform, config: &DroneDrawConfig) -> Self {
        let center = to_screen_vec(transform.to_display(drone.position));
        let radius = transform.length_to_display(drone.body.radius);
        let ring = (radius * config.stroke_ratio).max(1.0);
        let heading = screen_heading(drone);
        let nose_from = center + heading * (radius * config.line_start_ratio);

        Self {
            center,
            ring_outer: radius + ring * 0.5,
            ring_inner: (radius - ring * 0.5).max(0.0),
            nose_from,
            nose_to: nose_from + heading * (radius * config.line_length_ratio),
            nose_width: (radius * config.line_thickness_ratio).max(1.0),
        }
    }
}

pub fn draw_drone(drone: &DroneState, transform: &ScreenTransform, config: &DroneDrawConfig) {
    let shape = DroneShape::new(drone, transform, config);
    let DroneShape { center, .. } = shape;

    // Filled disk over a slightly larger one reads as a ring.
    draw_circle(center.x, center.y, shape.ring_outer, config.stroke_color);
    if shape.ring_inner > 0.0 {
        draw_circle(center.x, center.y, shape.ring_inner, config.fill_color);
    }

    let (from, to) = (shape.nose_from, shape.nose_to);
    draw_line(from.x, from.y, to.x, to.y, shape.nose_width, config.stroke_color);
    for cap in [from, to] {
        draw_circle(cap.x, cap.y, shape.nose_width * 0.5, config.stroke_color);
    }
}
