use drone2d_core::{Action, SimMode, Snapshot};
use macroquad::prelude::*;

use crate::render::draw_text_centered;

const TITLE: &str = "Game Menu";
const TITLE_Y: f32 = 50.0;
const TITLE_SIZE: f32 = 30.0;
const BUTTON_TOP: f32 = 90.0;
const BUTTON_HEIGHT: f32 = 40.0;
const BUTTON_GAP: f32 = 12.0;
const SIDE_MARGIN: f32 = 20.0;
const TEXT_SIZE: f32 = 20.0;
const LINE_HEIGHT: f32 = 24.0;

pub const PANEL_COLOR: Color = Color::new(0.59, 0.59, 0.59, 0.5);
const BUTTON_COLOR: Color = Color::new(0.85, 0.85, 0.85, 1.0);

const KEY_HELP: &[&str] = &[
    "arrows / WASD: move",
    "Q / E: rotate",
    "P: pause  Space: resume",
    "Tab: obstacle editor",
    "Esc: quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Editor,
    PauseResume,
    Quit,
}

impl ButtonKind {
    pub fn label(self, mode: SimMode) -> &'static str {
        match (self, mode) {
            (ButtonKind::Editor, SimMode::Editing) => "Finish editing",
            (ButtonKind::Editor, _) => "Edit obstacles",
            (ButtonKind::PauseResume, SimMode::Flying) => "Pause",
            (ButtonKind::PauseResume, _) => "Resume",
            (ButtonKind::Quit, _) => "Quit",
        }
    }

    pub fn action(self, mode: SimMode) -> Action {
        match (self, mode) {
            (ButtonKind::Editor, _) => Action::ToggleEditor,
            (ButtonKind::PauseResume, SimMode::Flying) => Action::Pause,
            (ButtonKind::PauseResume, _) => Action::Resume,
            (ButtonKind::Quit, _) => Action::Quit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuButton {
    pub kind: ButtonKind,
    pub rect: Rect,
}

/// Side panel right of the playground.
#[derive(Debug, Clone)]
pub struct Menu {
    panel: Rect,
    buttons: Vec<MenuButton>,
}

impl Menu {
    pub fn new(panel: Rect) -> Self {
        let width = (panel.w - 2.0 * SIDE_MARGIN).max(0.0);
        let buttons = [ButtonKind::Editor, ButtonKind::PauseResume, ButtonKind::Quit]
            .into_iter()
            .enumerate()
            .map(|(index, kind)| MenuButton {
                kind,
                rect: Rect::new(
                    panel.x + SIDE_MARGIN,
                    panel.y + BUTTON_TOP + index as f32 * (BUTTON_HEIGHT + BUTTON_GAP),
                    width,
                    BUTTON_HEIGHT,
                ),
            })
            .collect();

        Self { panel, buttons }
    }

    pub fn buttons(&self) -> &[MenuButton] {
        &self.buttons
    }

    pub fn action_at(&self, point: Vec2, mode: SimMode) -> Option<Action> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains(point))
            .map(|button| button.kind.action(mode))
    }

    fn status_top(&self) -> f32 {
        let buttons_bottom = self
            .buttons
            .last()
            .map_or(self.panel.y + BUTTON_TOP, |button| button.rect.bottom());
        buttons_bottom + 2.0 * LINE_HEIGHT
    }

    pub fn draw(&self, snapshot: &Snapshot<'_>, fps: f32) {
        draw_rectangle(self.panel.x, self.panel.y, self.panel.w, self.panel.h, PANEL_COLOR);
        draw_text_centered(
            TITLE,
            vec2(self.panel.center().x, self.panel.y + TITLE_Y),
            TITLE_SIZE,
            BLACK,
        );

        for button in &self.buttons {
            let rect = button.rect;
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, BUTTON_COLOR);
            draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, BLACK);
            draw_text_centered(button.kind.label(snapshot.mode), rect.center(), TEXT_SIZE, BLACK);
        }

        let x = self.panel.x + SIDE_MARGIN;
        let mut y = self.status_top();
        for line in status_lines(snapshot, fps) {
            draw_text(&line, x, y, TEXT_SIZE, BLACK);
            y += LINE_HEIGHT;
        }

        y += LINE_HEIGHT;
        for line in KEY_HELP {
            draw_text(line, x, y, TEXT_SIZE, DARKGRAY);
            y += LINE_HEIGHT;
        }
    }
}

pub fn status_lines(snapshot: &Snapshot<'_>, fps: f32) -> Vec<String> {
    let drone = snapshot.drone;
    let mut lines = vec![
        format!("mode: {}", snapshot.mode.label()),
        format!("time: {:.1} s", snapshot.flight_seconds),
        format!(
            "position: {:.2}, {:.2} m",
            drone.position.x, drone.position.y
        ),
        format!("heading: {:.0} deg", drone.heading.to_degrees()),
        format!("speed: {:.2} m/s", drone.speed()),
        format!("yaw rate: {:.2} rad/s", drone.yaw_rate),
        format!("crashes: {}", snapshot.crash_count),
        format!("obstacles: {}", snapshot.obstacles.len()),
    ];
    if snapshot.mode == SimMode::Editing {
        lines.push(format!("pending points: {}", snapshot.pending_obstacle.len()));
    }
    lines.push(format!("fps: {:.1}", fps));
    lines
}
