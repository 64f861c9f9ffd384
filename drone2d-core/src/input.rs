use glam::{Vec2, vec2};
use serde::{Deserialize, Serialize};

/// Logical actions, independent of any windowing backend's key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Thrust,
    Brake,
    RotateLeft,
    RotateRight,
    Pause,
    Resume,
    Quit,
    ToggleEditor,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Thrust,
        Action::Brake,
        Action::RotateLeft,
        Action::RotateRight,
        Action::Pause,
        Action::Resume,
        Action::Quit,
        Action::ToggleEditor,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of actions whose keys are held during the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldActions(u16);

impl HeldActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|action| self.contains(*action))
    }
}

impl FromIterator<Action> for HeldActions {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut held = HeldActions::new();
        for action in iter {
            held.insert(action);
        }
        held
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlLimits {
    pub max_force: f32,
    pub max_moment: f32,
}

/// Body-frame force and scalar moment requested by the pilot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlCommand {
    pub force: Vec2,
    pub moment: f32,
}

impl ControlCommand {
    pub const ZERO: Self = Self {
        force: Vec2::ZERO,
        moment: 0.0,
    };
}

impl Default for ControlCommand {
    fn default() -> Self {
        Self::ZERO
    }
}

fn axis(held: &HeldActions, positive: Action, negative: Action) -> f32 {
    let mut value = 0.0;
    if held.contains(positive) {
        value += 1.0;
    }
    if held.contains(negative) {
        value -= 1.0;
    }
    value
}

/// Builds the command for one frame from the held set alone. Opposing keys
/// cancel; force magnitude and moment are capped independently.
pub fn map_held(held: &HeldActions, limits: &ControlLimits) -> ControlCommand {
    let direction = vec2(
        axis(held, Action::MoveRight, Action::MoveLeft),
        axis(held, Action::Thrust, Action::Brake),
    );
    let force = (direction * limits.max_force).clamp_length_max(limits.max_force);
    let moment = (axis(held, Action::RotateLeft, Action::RotateRight) * limits.max_moment)
        .clamp(-limits.max_moment, limits.max_moment);

    ControlCommand { force, moment }
}
