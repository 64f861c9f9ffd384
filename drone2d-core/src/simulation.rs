use glam::Vec2;
use tracing::{debug, info};

use crate::collision::{CollisionHit, first_collision};
use crate::config::{ConfigError, SimConfig};
use crate::coordinates::{ScreenTransform, Viewport};
use crate::drone::DroneState;
use crate::editor::{ClickKind, EditorOutcome, ObstacleEditor};
use crate::fixtures::FixtureScatter;
use crate::input::{Action, ControlLimits, HeldActions, map_held};
use crate::obstacles::{ObstacleStore, Polyline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    Flying,
    Paused,
    /// Drone was reset after a collision; waits for `Resume`.
    Crashed,
    Editing,
}

impl SimMode {
    pub fn label(self) -> &'static str {
        match self {
            SimMode::Flying => "flying",
            SimMode::Paused => "paused",
            SimMode::Crashed => "crashed",
            SimMode::Editing => "editing obstacles",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    ActionPressed(Action),
    MouseDown { click: ClickKind, position_px: Vec2 },
    CloseRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Physics did not run in the current mode.
    Frozen,
    Advanced,
    Crashed(CollisionHit),
}

/// Read-only view handed to the render stage.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub drone: &'a DroneState,
    pub obstacles: &'a [Polyline],
    pub pending_obstacle: &'a [Vec2],
    pub mode: SimMode,
    pub crash_count: u32,
    pub last_crash: Option<Vec2>,
    pub flight_seconds: f64,
    pub transform: ScreenTransform,
    pub viewport: Viewport,
}

/// Owns all mutable simulation state; driven once per fixed step by the loop.
pub struct Simulation {
    transform: ScreenTransform,
    viewport: Viewport,
    limits: ControlLimits,
    initial_drone: DroneState,
    drone: DroneState,
    obstacles: ObstacleStore,
    editor: ObstacleEditor,
    mode: SimMode,
    running: bool,
    crash_count: u32,
    last_crash: Option<Vec2>,
    flight_seconds: f64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let playground = config.screen.playground_size();
        let initial_drone = config.initial_drone();
        let mut obstacles = ObstacleStore::with_playground(playground);

        for points in &config.fixtures.polylines {
            obstacles.push(points.clone());
        }
        if config.fixtures.random_count > 0 {
            let clearance = config.fixtures.start_clearance.max(initial_drone.body.radius);
            let scattered = FixtureScatter::new(config.fixtures.seed).scatter(
                config.fixtures.random_count,
                playground,
                initial_drone.position,
                clearance,
            );
            debug!(
                requested = config.fixtures.random_count,
                placed = scattered.len(),
                seed = config.fixtures.seed,
                "scattered random fixtures"
            );
            for polyline in scattered {
                obstacles.push_polyline(polyline);
            }
        }

        info!(
            width_m = playground.x,
            height_m = playground.y,
            obstacles = obstacles.len(),
            "simulation ready"
        );

        Ok(Self {
            transform: config.screen.transform(),
            viewport: config.screen.viewport(),
            limits: config.drone.limits(),
            initial_drone,
            drone: initial_drone,
            obstacles,
            editor: ObstacleEditor::with_keep_clear(
                initial_drone.position,
                initial_drone.body.radius,
            ),
            mode: SimMode::Flying,
            running: true,
            crash_count: 0,
            last_crash: None,
            flight_seconds: 0.0,
        })
    }

    pub fn drone(&self) -> &DroneState {
        &self.drone
    }

    pub fn initial_drone(&self) -> &DroneState {
        &self.initial_drone
    }

    pub fn obstacles(&self) -> &ObstacleStore {
        &self.obstacles
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// True while the modal pause or crash acknowledgement is showing.
    pub fn paused(&self) -> bool {
        matches!(self.mode, SimMode::Paused | SimMode::Crashed)
    }

    pub fn crash_count(&self) -> u32 {
        self.crash_count
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            drone: &self.drone,
            obstacles: self.obstacles.as_slice(),
            pending_obstacle: self.editor.pending(),
            mode: self.mode,
            crash_count: self.crash_count,
            last_crash: self.last_crash,
            flight_seconds: self.flight_seconds,
            transform: self.transform,
            viewport: self.viewport,
        }
    }

    /// Applies a discrete event. Returns the editor result for clicks.
    pub fn handle_event(&mut self, event: SimEvent) -> Option<EditorOutcome> {
        match event {
            SimEvent::CloseRequested => {
                self.quit();
                None
            }
            SimEvent::ActionPressed(action) => {
                self.handle_action(action);
                None
            }
            SimEvent::MouseDown { click, position_px } => {
                if self.mode != SimMode::Editing {
                    return None;
                }
                Some(self.editor.handle_click(
                    click,
                    position_px,
                    &self.viewport,
                    &self.transform,
                    &mut self.obstacles,
                ))
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match (action, self.mode) {
            (Action::Quit, _) => self.quit(),
            (Action::Pause, SimMode::Flying) => self.set_mode(SimMode::Paused),
            (Action::Resume, SimMode::Paused | SimMode::Crashed) => {
                self.set_mode(SimMode::Flying)
            }
            (Action::ToggleEditor, SimMode::Flying | SimMode::Paused) => {
                self.set_mode(SimMode::Editing)
            }
            (Action::ToggleEditor, SimMode::Editing) => {
                self.editor.cancel();
                self.set_mode(SimMode::Flying);
            }
            _ => {}
        }
    }

    fn set_mode(&mut self, mode: SimMode) {
        if self.mode != mode {
            debug!(from = self.mode.label(), to = mode.label(), "mode change");
            self.mode = mode;
        }
    }

    fn quit(&mut self) {
        if self.running {
            info!("quit requested");
        }
        self.running = false;
    }

    /// Runs one physics step of `dt` seconds with the currently held actions.
    pub fn step(&mut self, dt: f32, held: &HeldActions) -> StepOutcome {
        if !self.running || self.mode != SimMode::Flying {
            return StepOutcome::Frozen;
        }

        self.drone.apply_command(map_held(held, &self.limits));
        self.drone.advance(dt);
        if dt.is_finite() && dt > 0.0 {
            self.flight_seconds += f64::from(dt);
        }

        match first_collision(self.drone.position, self.drone.body.radius, &self.obstacles) {
            Some(hit) => {
                info!(
                    obstacle = hit.obstacle,
                    segment = hit.segment,
                    x = self.drone.position.x,
                    y = self.drone.position.y,
                    "drone crashed, resetting"
                );
                self.last_crash = Some(self.drone.position);
                self.drone = self.initial_drone;
                self.crash_count += 1;
                self.set_mode(SimMode::Crashed);
                StepOutcome::Crashed(hit)
            }
            None => StepOutcome::Advanced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    const DT: f32 = 1.0 / 60.0;

    fn simulation() -> Simulation {
        Simulation::new(SimConfig::default()).expect("default config")
    }

    fn held(actions: &[Action]) -> HeldActions {
        actions.iter().copied().collect()
    }

    #[test]
    fn flying_into_floor_resets_exactly_once() {
        let mut sim = simulation();
        let brake = held(&[Action::Brake]);

        let mut crashes = 0;
        for _ in 0..600 {
            if let StepOutcome::Crashed(hit) = sim.step(DT, &brake) {
                crashes += 1;
                assert_eq!((hit.obstacle, hit.segment), (0, 0));
                assert_eq!(sim.drone(), sim.initial_drone());
                assert_eq!(sim.drone().velocity_nav, Vec2::ZERO);
                assert_eq!(sim.drone().yaw_rate, 0.0);
            }
        }

        assert_eq!(crashes, 1);
        assert_eq!(sim.crash_count(), 1);
        assert_eq!(sim.mode(), SimMode::Crashed);
        assert!(sim.paused());
        let crash_at = sim.snapshot().last_crash.expect("crash position recorded");
        assert!(crash_at.y <= 0.3);
    }

    #[test]
    fn crash_requires_acknowledgement() {
        let mut sim = simulation();
        let brake = held(&[Action::Brake]);
        while !matches!(sim.step(DT, &brake), StepOutcome::Crashed(_)) {}

        assert_eq!(sim.step(DT, &brake), StepOutcome::Frozen);
        sim.handle_event(SimEvent::ActionPressed(Action::Pause));
        sim.handle_event(SimEvent::ActionPressed(Action::ToggleEditor));
        assert_eq!(sim.mode(), SimMode::Crashed);

        sim.handle_event(SimEvent::ActionPressed(Action::Resume));
        assert_eq!(sim.mode(), SimMode::Flying);
        assert_eq!(sim.step(DT, &HeldActions::new()), StepOutcome::Advanced);
    }

    #[test]
    fn pause_freezes_physics() {
        let mut sim = simulation();
        sim.handle_event(SimEvent::ActionPressed(Action::Pause));
        assert!(sim.paused());
        let before = *sim.drone();
        assert_eq!(sim.step(DT, &held(&[Action::Thrust])), StepOutcome::Frozen);
        assert_eq!(*sim.drone(), before);

        sim.handle_event(SimEvent::ActionPressed(Action::Resume));
        assert!(!sim.paused());
        assert_eq!(sim.step(DT, &held(&[Action::Thrust])), StepOutcome::Advanced);
        assert!(sim.drone().velocity_nav.y > 0.0);
    }

    #[test]
    fn quit_is_honoured_in_every_mode() {
        let mut sim = simulation();
        sim.handle_event(SimEvent::ActionPressed(Action::Pause));
        sim.handle_event(SimEvent::ActionPressed(Action::Quit));
        assert!(!sim.running());
        assert_eq!(sim.step(DT, &HeldActions::new()), StepOutcome::Frozen);

        let mut sim = simulation();
        sim.handle_event(SimEvent::CloseRequested);
        assert!(!sim.running());
    }

    #[test]
    fn editor_clicks_only_count_in_editing_mode() {
        let mut sim = simulation();
        let click = |kind, x, y| SimEvent::MouseDown {
            click: kind,
            position_px: vec2(x, y),
        };

        assert_eq!(sim.handle_event(click(ClickKind::Primary, 10.0, 10.0)), None);

        sim.handle_event(SimEvent::ActionPressed(Action::ToggleEditor));
        assert_eq!(sim.mode(), SimMode::Editing);
        assert_eq!(sim.step(DT, &HeldActions::new()), StepOutcome::Frozen);

        sim.handle_event(click(ClickKind::Primary, 10.0, 10.0));
        assert_eq!(
            sim.handle_event(click(ClickKind::Primary, 1100.0, 300.0)),
            Some(EditorOutcome::Ignored)
        );
        assert_eq!(
            sim.handle_event(click(ClickKind::Secondary, 50.0, 50.0)),
            Some(EditorOutcome::Committed { index: 1, points: 2 })
        );
        assert_eq!(sim.obstacles().len(), 2);

        sim.handle_event(click(ClickKind::Primary, 300.0, 300.0));
        assert_eq!(sim.snapshot().pending_obstacle.len(), 1);
        sim.handle_event(SimEvent::ActionPressed(Action::ToggleEditor));
        assert_eq!(sim.mode(), SimMode::Flying);
        assert!(sim.snapshot().pending_obstacle.is_empty());
        assert_eq!(sim.obstacles().len(), 2);
    }

    #[test]
    fn resume_after_crash_flies_again() {
        let mut sim = simulation();
        sim.handle_event(SimEvent::ActionPressed(Action::ToggleEditor));
        let click = |kind, x, y| SimEvent::MouseDown {
            click: kind,
            position_px: vec2(x, y),
        };
        sim.handle_event(click(ClickKind::Primary, 300.0, 700.0));
        assert_eq!(
            sim.handle_event(click(ClickKind::Secondary, 500.0, 700.0)),
            Some(EditorOutcome::Blocked)
        );
        sim.handle_event(SimEvent::ActionPressed(Action::ToggleEditor));

        let brake = held(&[Action::Brake]);
        while !matches!(sim.step(DT, &brake), StepOutcome::Crashed(_)) {}
        for _ in 0..5 {
            sim.handle_event(SimEvent::ActionPressed(Action::Resume));
            assert_eq!(sim.step(DT, &HeldActions::new()), StepOutcome::Advanced);
        }
        assert_eq!(sim.crash_count(), 1);
    }

    #[test]
    fn fixtures_are_added_after_boundary() {
        let mut config = SimConfig::default();
        config.fixtures.polylines = vec![vec![vec2(1.0, 5.0), vec2(3.0, 5.0)]];
        config.fixtures.random_count = 4;
        let sim = Simulation::new(config).expect("valid config");

        let obstacles = sim.obstacles();
        assert!(obstacles.len() >= 2);
        assert_eq!(obstacles.boundary().points().len(), 5);
        assert_eq!(
            obstacles.get(1).map(|p| p.points().to_vec()),
            Some(vec![vec2(1.0, 5.0), vec2(3.0, 5.0)])
        );
        assert!(first_collision(sim.drone().position, sim.drone().body.radius, obstacles).is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SimConfig::default();
        config.drone.radius = -1.0;
        assert!(Simulation::new(config).is_err());
    }
}
