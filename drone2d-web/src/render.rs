use drone2d_core::{Polyline, ScreenTransform, SimMode, Snapshot};
use macroquad::prelude::*;

use crate::drone::{DroneDrawConfig, draw_drone};
use crate::menu::Menu;
use crate::to_screen_vec;

const BOUNDARY_THICKNESS: f32 = 4.0;
const OBSTACLE_THICKNESS: f32 = 2.0;
const PENDING_COLOR: Color = Color::from_rgba(0, 0, 255, 255);
const CRASH_COLOR: Color = Color::from_rgba(255, 0, 0, 255);
const OVERLAY_TEXT_SIZE: f32 = 28.0;

/// Converts a polyline's points to screen pixels, preserving order.
pub fn polyline_to_screen(points: &[drone2d_core::Vec2], transform: &ScreenTransform) -> Vec<Vec2> {
    transform
        .to_display_all(points)
        .into_iter()
        .map(to_screen_vec)
        .collect()
}

pub fn obstacle_thickness(index: usize) -> f32 {
    if index == 0 {
        BOUNDARY_THICKNESS
    } else {
        OBSTACLE_THICKNESS
    }
}

pub fn overlay_message(mode: SimMode) -> Option<&'static str> {
    match mode {
        SimMode::Flying => None,
        SimMode::Paused => Some("Paused - press Space to resume"),
        SimMode::Crashed => Some("Crashed! Press Space to continue"),
        SimMode::Editing => Some("Left click: add point  Right click: finish obstacle"),
    }
}

pub fn draw_text_centered(text: &str, center: Vec2, font_size: f32, color: Color) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    draw_text(
        text,
        center.x - dims.width / 2.0,
        center.y + dims.offset_y / 2.0,
        font_size,
        color,
    );
}

fn draw_polyline(points: &[Vec2], thickness: f32, color: Color) {
    for pair in points.windows(2) {
        draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, thickness, color);
    }
}

fn draw_obstacles(obstacles: &[Polyline], transform: &ScreenTransform) {
    for (index, obstacle) in obstacles.iter().enumerate() {
        let points = polyline_to_screen(obstacle.points(), transform);
        draw_polyline(&points, obstacle_thickness(index), BLACK);
    }
}

fn draw_pending(points: &[drone2d_core::Vec2], transform: &ScreenTransform) {
    let points = polyline_to_screen(points, transform);
    draw_polyline(&points, OBSTACLE_THICKNESS, PENDING_COLOR);
    for point in &points {
        draw_circle(point.x, point.y, 4.0, PENDING_COLOR);
    }
}

fn draw_crash_marker(position: drone2d_core::Vec2, radius_m: f32, transform: &ScreenTransform) {
    let center = to_screen_vec(transform.to_display(position));
    let half = transform.length_to_display(radius_m);
    draw_line(center.x - half, center.y - half, center.x + half, center.y + half, 3.0, CRASH_COLOR);
    draw_line(center.x - half, center.y + half, center.x + half, center.y - half, 3.0, CRASH_COLOR);
}

/// Draws one frame from a read-only snapshot.
pub fn render_frame(snapshot: &Snapshot<'_>, menu: &Menu, drone_draw: &DroneDrawConfig, fps: f32) {
    clear_background(WHITE);
    let transform = &snapshot.transform;

    draw_obstacles(snapshot.obstacles, transform);
    if !snapshot.pending_obstacle.is_empty() {
        draw_pending(snapshot.pending_obstacle, transform);
    }
    if snapshot.mode == SimMode::Crashed {
        if let Some(position) = snapshot.last_crash {
            draw_crash_marker(position, snapshot.drone.body.radius, transform);
        }
    }

    draw_drone(snapshot.drone, transform, drone_draw);
    menu.draw(snapshot, fps);

    if let Some(message) = overlay_message(snapshot.mode) {
        let center = to_screen_vec(snapshot.viewport.center());
        let color = if snapshot.mode == SimMode::Crashed {
            CRASH_COLOR
        } else {
            BLACK
        };
        draw_text_centered(message, center, OVERLAY_TEXT_SIZE, color);
    }
}
