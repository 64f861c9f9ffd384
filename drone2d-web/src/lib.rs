use drone2d_core::{
    ClickKind, ConfigError, FixedStepClock, HeldActions, SimConfig, SimEvent, SimMode,
    Simulation, StepOutcome,
};
#[cfg(target_arch = "wasm32")]
use macroquad::miniquad;
use macroquad::prelude::*;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::drone::DroneDrawConfig;
use crate::menu::Menu;

mod drone;
mod input;
mod menu;
mod render;

const WINDOW_TITLE: &str = "2D Drone Simulation";
const CONFIG_ENV_VAR: &str = "DRONE2D_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "drone2d.json";
const FPS_INTERVAL_SECS: f64 = 1.0;

pub(crate) fn to_screen_vec(v: drone2d_core::Vec2) -> Vec2 {
    vec2(v.x, v.y)
}

pub(crate) fn to_sim_vec(v: Vec2) -> drone2d_core::Vec2 {
    drone2d_core::vec2(v.x, v.y)
}

static CONFIG: OnceLock<SimConfig> = OnceLock::new();

/// Configuration shared by the window setup and the simulation. Read once,
/// on first use, from `$DRONE2D_CONFIG` or `drone2d.json`, falling back to
/// the defaults when neither is usable.
pub fn config() -> &'static SimConfig {
    CONFIG.get_or_init(|| {
        // Window setup runs before `run`, so install logging here too.
        init_logging();
        load_config()
    })
}

fn load_config() -> SimConfig {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let explicit = std::env::var(CONFIG_ENV_VAR).ok();
        let path = explicit
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        if explicit.is_none() && !std::path::Path::new(&path).exists() {
            return SimConfig::default();
        }
        match SimConfig::load(&path) {
            Ok(config) => {
                info!(path = %path, "loaded configuration");
                config
            }
            Err(err) => {
                warn!(path = %path, error = %err, "ignoring configuration, using defaults");
                SimConfig::default()
            }
        }
    }
    #[cfg(target_arch = "wasm32")]
    {
        let _ = (CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH);
        SimConfig::default()
    }
}

pub fn window_conf() -> Conf {
    let config = config();
    Conf {
        window_title: WINDOW_TITLE.to_owned(),
        window_width: config.screen.width_px.round() as i32,
        window_height: config.screen.height_px.round() as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn menu_panel(config: &SimConfig) -> Rect {
    let left = config.screen.playground_width_px();
    Rect::new(left, 0.0, config.screen.width_px - left, config.screen.height_px)
}

/// Clicks on a menu button become that button's action; everything else goes
/// to the simulation as a mouse event.
fn route_click(menu: &Menu, mode: SimMode, click: ClickKind, position: Vec2) -> SimEvent {
    if click == ClickKind::Primary {
        if let Some(action) = menu.action_at(position, mode) {
            return SimEvent::ActionPressed(action);
        }
    }
    SimEvent::MouseDown {
        click,
        position_px: to_sim_vec(position),
    }
}

struct GameState {
    sim: Simulation,
    clock: FixedStepClock,
    menu: Menu,
    drone_draw: DroneDrawConfig,
    fps: f32,
    fps_frame_count: u32,
    fps_last_update_time: f64,
}

impl GameState {
    fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let clock = FixedStepClock::new(
            config.timing.fixed_step_seconds,
            config.timing.max_steps_per_frame,
        );
        let menu = Menu::new(menu_panel(&config));
        let sim = Simulation::new(config)?;

        Ok(Self {
            sim,
            clock,
            menu,
            drone_draw: DroneDrawConfig::default(),
            fps: 0.0,
            fps_frame_count: 0,
            fps_last_update_time: 0.0,
        })
    }

    fn poll_events(&mut self) {
        if is_quit_requested() {
            self.sim.handle_event(SimEvent::CloseRequested);
        }

        for action in input::pressed_actions() {
            self.sim.handle_event(SimEvent::ActionPressed(action));
        }

        let (mouse_x, mouse_y) = mouse_position();
        let position = vec2(mouse_x, mouse_y);
        for click in input::pressed_clicks() {
            let event = route_click(&self.menu, self.sim.mode(), click, position);
            if let Some(outcome) = self.sim.handle_event(event) {
                tracing::debug!(?outcome, "editor click");
            }
        }
    }

    fn fixed_update(&mut self, held: &HeldActions) {
        let dt = self.clock.step_seconds();
        if let StepOutcome::Crashed(hit) = self.sim.step(dt, held) {
            info!(
                obstacle = hit.obstacle,
                crashes = self.sim.crash_count(),
                "crashed, waiting for acknowledgement"
            );
        }
    }

    fn update_fps_if_due(&mut self) {
        let now = get_time();
        self.fps_frame_count += 1;
        let elapsed = now - self.fps_last_update_time;
        if elapsed >= FPS_INTERVAL_SECS {
            self.fps = self.fps_frame_count as f32 / elapsed as f32;
            self.fps_frame_count = 0;
            self.fps_last_update_time = now;
        }
    }

    fn render(&self) {
        render::render_frame(&self.sim.snapshot(), &self.menu, &self.drone_draw, self.fps);
    }
}

pub async fn run() {
    install_panic_hook();
    init_logging();

    let mut game = GameState::new(config().clone()).unwrap_or_else(|err| {
        warn!(error = %err, "configuration rejected, using defaults");
        GameState::new(SimConfig::default())
            .unwrap_or_else(|err| panic!("default configuration rejected: {err}"))
    });
    prevent_quit();

    loop {
        game.poll_events();
        if !game.sim.running() {
            break;
        }

        // Consume real elapsed time in fixed-size simulation steps.
        let steps = game.clock.advance(get_frame_time());
        let held = input::held_actions();
        for _ in 0..steps {
            game.fixed_update(&held);
        }

        game.update_fps_if_due();
        game.render();

        next_frame().await;
    }

    info!(
        ticks = game.clock.ticks(),
        seconds = game.clock.total_seconds(),
        "simulation stopped"
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed by an embedding binary.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {}

#[cfg(target_arch = "wasm32")]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if let Some(location) = info.location() {
            miniquad::error!("panic at {}:{}: {}", location.file(), location.line(), msg);
        } else {
            miniquad::error!("panic: {}", msg);
        }
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn install_panic_hook() {}
