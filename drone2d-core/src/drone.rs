use std::f32::consts::TAU;

use glam::{Mat2, Vec2, vec2};

use crate::input::ControlCommand;

/// Fixed physical properties of the disk-shaped drone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneBody {
    pub mass: f32,
    pub radius: f32,
    pub inertia: f32,
    pub damping: f32,
    pub rotational_damping: f32,
}

impl DroneBody {
    /// Mass and radius must be positive; inertia is that of a uniform disk.
    pub fn new(mass: f32, radius: f32, damping: f32, rotational_damping: f32) -> Self {
        Self {
            mass,
            radius,
            inertia: 0.5 * mass * radius * radius,
            damping,
            rotational_damping,
        }
    }
}

/// Translational and rotational state of the drone.
///
/// Navigation frame: x right, y up. `heading` is the counter-clockwise angle
/// of the body frame relative to the navigation frame, so at heading 0 body x
/// is the drone's right and body y its nose. Positive moments and yaw rates
/// turn counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneState {
    pub body: DroneBody,
    pub position: Vec2,
    pub heading: f32,
    pub velocity_body: Vec2,
    pub velocity_nav: Vec2,
    pub acceleration_body: Vec2,
    pub yaw_rate: f32,
    pub yaw_acceleration: f32,
    pub user_force: Vec2,
    pub user_moment: f32,
    pub drag_force: Vec2,
    pub drag_moment: f32,
    pub force: Vec2,
    pub moment: f32,
}

impl DroneState {
    pub fn at_rest(body: DroneBody, position: Vec2, heading: f32) -> Self {
        Self {
            body,
            position,
            heading: wrap_heading(heading),
            velocity_body: Vec2::ZERO,
            velocity_nav: Vec2::ZERO,
            acceleration_body: Vec2::ZERO,
            yaw_rate: 0.0,
            yaw_acceleration: 0.0,
            user_force: Vec2::ZERO,
            user_moment: 0.0,
            drag_force: Vec2::ZERO,
            drag_moment: 0.0,
            force: Vec2::ZERO,
            moment: 0.0,
        }
    }

    /// Body-to-navigation rotation for the current heading.
    pub fn rotation(&self) -> Mat2 {
        Mat2::from_angle(self.heading)
    }

    /// Unit vector of the drone's nose in the navigation frame.
    pub fn nose_direction(&self) -> Vec2 {
        self.rotation() * vec2(0.0, 1.0)
    }

    pub fn speed(&self) -> f32 {
        self.velocity_nav.length()
    }

    pub fn apply_command(&mut self, command: ControlCommand) {
        self.user_force = command.force;
        self.user_moment = command.moment;
    }

    /// Returns the state one semi-implicit Euler step of `dt` seconds later.
    pub fn integrate(&self, dt: f32) -> Self {
        let mut next = *self;
        next.advance(dt);
        next
    }

    /// Advances the state in place by `dt` seconds. A zero, negative or
    /// non-finite `dt` leaves every field untouched.
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        self.drag_force = -self.body.damping * self.velocity_body;
        self.drag_moment = -self.body.rotational_damping * self.yaw_rate;

        self.force = self.user_force + self.drag_force;
        self.moment = self.user_moment + self.drag_moment;

        self.acceleration_body = self.force / self.body.mass;
        self.yaw_acceleration = self.moment / self.body.inertia;

        // Velocity first, then position with the updated velocity.
        let rotation = self.rotation();
        self.velocity_nav += rotation * self.acceleration_body * dt;
        self.velocity_body = rotation.transpose() * self.velocity_nav;
        self.position += self.velocity_nav * dt;

        self.yaw_rate += self.yaw_acceleration * dt;
        self.heading = wrap_heading(self.heading + self.yaw_rate * dt);
    }
}

/// Normalizes an angle into [0, 2π).
pub fn wrap_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU.
    if wrapped >= TAU { 0.0 } else { wrapped }
}
