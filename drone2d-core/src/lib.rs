pub mod clock;
pub mod collision;
pub mod config;
pub mod coordinates;
pub mod drone;
pub mod editor;
pub mod fixtures;
pub mod input;
pub mod obstacles;
pub mod simulation;

pub use clock::FixedStepClock;
pub use collision::{CollisionHit, IntersectionMode, circle_segment_intersections, first_collision};
pub use config::{ConfigError, SimConfig};
pub use coordinates::{ScreenTransform, Viewport};
pub use drone::{DroneBody, DroneState, wrap_heading};
pub use editor::{ClickKind, EditorOutcome, ObstacleEditor};
pub use fixtures::FixtureScatter;
pub use glam::{Vec2, vec2};
pub use input::{Action, ControlCommand, ControlLimits, HeldActions, map_held};
pub use obstacles::{ObstacleStore, Polyline};
pub use simulation::{SimEvent, SimMode, Simulation, Snapshot, StepOutcome};
