use drone2d_core::{Action, ClickKind, HeldActions};
use macroquad::prelude::{
    KeyCode, MouseButton, is_key_down, is_key_pressed, is_mouse_button_pressed,
};

/// Keyboard layout. Several keys may map to the same action.
pub const KEY_BINDINGS: &[(KeyCode, Action)] = &[
    (KeyCode::Left, Action::MoveLeft),
    (KeyCode::A, Action::MoveLeft),
    (KeyCode::Right, Action::MoveRight),
    (KeyCode::D, Action::MoveRight),
    (KeyCode::Up, Action::Thrust),
    (KeyCode::W, Action::Thrust),
    (KeyCode::Down, Action::Brake),
    (KeyCode::S, Action::Brake),
    (KeyCode::Q, Action::RotateLeft),
    (KeyCode::E, Action::RotateRight),
    (KeyCode::P, Action::Pause),
    (KeyCode::Space, Action::Resume),
    (KeyCode::Enter, Action::Resume),
    (KeyCode::Escape, Action::Quit),
    (KeyCode::Tab, Action::ToggleEditor),
];

pub fn action_for_key(key: KeyCode) -> Option<Action> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, action)| *action)
}

pub fn click_kind(button: MouseButton) -> Option<ClickKind> {
    match button {
        MouseButton::Left => Some(ClickKind::Primary),
        MouseButton::Right => Some(ClickKind::Secondary),
        _ => None,
    }
}

/// Actions whose keys are down this frame.
pub fn held_actions() -> HeldActions {
    KEY_BINDINGS
        .iter()
        .filter(|(key, _)| is_key_down(*key))
        .map(|(_, action)| *action)
        .collect()
}

/// Actions whose keys went down this frame, without duplicates.
pub fn pressed_actions() -> Vec<Action> {
    let mut pressed = Vec::new();
    for (key, action) in KEY_BINDINGS {
        if is_key_pressed(*key) && !pressed.contains(action) {
            pressed.push(*action);
        }
    }
    pressed
}

pub fn pressed_clicks() -> Vec<ClickKind> {
    [MouseButton::Left, MouseButton::Right]
        .into_iter()
        .filter(|button| is_mouse_button_pressed(*button))
        .filter_map(click_kind)
        .collect()
}
